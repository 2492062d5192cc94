//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ConfigureImageUseCase` - Working copy, rewrite, sizing, Packer template
//! - `ConfigureClusterUseCase` - Placement, security rule, cluster configuration
//! - `make_image` / `make_cluster` - Run the external build tools

pub mod cluster;
pub mod image;
pub mod tools;

pub use cluster::{ClusterConfiguration, ClusterOptions, ConfigureClusterUseCase};
pub use image::{payload_size, ConfigureImageUseCase, ImageConfiguration, ImageOptions};
pub use tools::{cluster_name, make_cluster, make_image};
