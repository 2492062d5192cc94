//! vaws - simulation images and clusters on AWS
//!
//! vaws packages a simulation source tree into a machine image build and
//! describes a compute cluster that runs on that image. Model
//! specifications are rewritten so their data artifacts resolve inside the
//! image, the build instance is sized to the artifacts, and the cluster's
//! security rule is created once per VPC.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use config::Config;
pub use domain::entities::{ArtifactReference, InstanceSelection, SecurityRule};
pub use domain::ports::ProviderContext;
pub use error::{VawsError, VawsResult};
