//! Cloud provider ports
//!
//! The domain talks to the provider only through these traits. Every call
//! carries a `ProviderContext` so region and profile are explicit inputs
//! rather than ambient process state.

use crate::domain::entities::{IngressPermission, InstanceCatalogEntry, SecurityRule};
use crate::error::VawsResult;

/// Provider error code returned when a security group name is already taken.
pub const DUPLICATE_GROUP_CODE: &str = "InvalidGroup.Duplicate";

/// Provider error code returned when a group already has an ingress permission.
pub const DUPLICATE_PERMISSION_CODE: &str = "InvalidPermission.Duplicate";

/// Where and as whom provider calls are made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContext {
    pub region: String,
    pub profile: Option<String>,
}

impl ProviderContext {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }
}

/// Machine type catalog
pub trait InstanceCatalog {
    /// Describe the named instance types. Order of the result is unspecified.
    fn describe_instance_types(
        &self,
        ctx: &ProviderContext,
        instance_types: &[&str],
    ) -> VawsResult<Vec<InstanceCatalogEntry>>;
}

/// Security group management
pub trait SecurityRules {
    /// Id of the group with this name in the VPC, if any.
    fn find_group(
        &self,
        ctx: &ProviderContext,
        vpc_id: &str,
        name: &str,
    ) -> VawsResult<Option<String>>;

    /// Create an empty group and return its id.
    ///
    /// Fails with a provider error carrying [`DUPLICATE_GROUP_CODE`] when the
    /// name is already taken in the VPC.
    fn create_group(
        &self,
        ctx: &ProviderContext,
        vpc_id: &str,
        rule: &SecurityRule,
    ) -> VawsResult<String>;

    /// Add an ingress permission to a group.
    ///
    /// Fails with a provider error carrying [`DUPLICATE_PERMISSION_CODE`]
    /// when the group already has it.
    fn authorize_ingress(
        &self,
        ctx: &ProviderContext,
        group_id: &str,
        permission: &IngressPermission,
    ) -> VawsResult<()>;
}

/// Read-only lookups of account resources
pub trait NetworkInventory {
    fn default_vpc(&self, ctx: &ProviderContext) -> VawsResult<Option<String>>;

    fn subnets(&self, ctx: &ProviderContext, vpc_id: &str) -> VawsResult<Vec<String>>;

    fn key_pairs(&self, ctx: &ProviderContext) -> VawsResult<Vec<String>>;

    fn image_exists(&self, ctx: &ProviderContext, image_id: &str) -> VawsResult<bool>;
}

/// Object storage
pub trait ObjectStorage {
    /// Store `body` at `s3://bucket/key` and return that URI.
    fn put_object(
        &self,
        ctx: &ProviderContext,
        bucket: &str,
        key: &str,
        body: &str,
    ) -> VawsResult<String>;
}
