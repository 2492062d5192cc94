//! Domain Entities
//!
//! - `ArtifactReference` - A data file referenced by a model specification
//! - `InstanceCatalogEntry` / `InstanceSelection` - Machine sizing
//! - `SecurityRule` - Named ingress permissions
//! - `ImageSpec` - Packer build template
//! - `ClusterSettings` / `IniDocument` - parallelcluster configuration

mod artifact;
mod cluster_config;
mod image_spec;
mod instance;
mod security_rule;

pub use artifact::{ArtifactReference, IMAGE_ARTIFACT_DIR};
pub use cluster_config::{post_install_script, ClusterSettings, IniDocument, POST_INSTALL_KEY};
pub use image_spec::{
    provision_script, AmazonEbsBuilder, ImageSpec, Provisioner, CODE_ARCHIVE_NAME,
    PROVISION_SCRIPT_NAME, SOURCE_IMAGE_PATTERN,
};
pub use instance::{InstanceCatalogEntry, InstanceSelection};
pub use security_rule::{IngressPermission, Protocol, SecurityRule, MOSH_GROUP_NAME, MOSH_PORT};
