//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod cloud;

pub use cloud::{
    InstanceCatalog, NetworkInventory, ObjectStorage, ProviderContext, SecurityRules,
    DUPLICATE_GROUP_CODE, DUPLICATE_PERMISSION_CODE,
};
