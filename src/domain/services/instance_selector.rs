//! Instance sizing for image builds
//!
//! The build instance must hold the artifacts in memory on top of the
//! parallelcluster base image. Only inexpensive general-purpose types are
//! considered; anything bigger is a manual decision.

use tracing::{debug, warn};

use crate::domain::entities::{InstanceCatalogEntry, InstanceSelection};
use crate::domain::ports::{InstanceCatalog, ProviderContext};
use crate::error::VawsResult;

/// Candidate build instance types.
pub const GENERAL_PURPOSE_INSTANCE_TYPES: [&str; 7] = [
    "t2.nano",
    "t2.micro",
    "t2.small",
    "t2.medium",
    "t2.large",
    "t2.xlarge",
    "t2.2xlarge",
];

/// Memory reserved for the parallelcluster base image (4096 MiB).
pub const BASE_IMAGE_OVERHEAD_BYTES: u64 = 4096 * 1024 * 1024;

/// Pick the smallest entry whose memory strictly exceeds `payload + overhead`.
pub fn select_from(
    catalog: &[InstanceCatalogEntry],
    payload_bytes: u64,
    overhead_bytes: u64,
) -> InstanceSelection {
    let required_bytes = payload_bytes.saturating_add(overhead_bytes);

    let mut sorted: Vec<&InstanceCatalogEntry> = catalog.iter().collect();
    sorted.sort_by_key(|e| e.memory_bytes);

    match sorted.into_iter().find(|e| e.memory_bytes > required_bytes) {
        Some(entry) => InstanceSelection::Selected(entry.clone()),
        None => InstanceSelection::Unresolved { required_bytes },
    }
}

/// Fetch the candidate catalog and choose a build instance for the payload.
///
/// A payload too large for every candidate is not an error: a warning is
/// logged and `Unresolved` is returned so the caller leaves the type unset.
pub fn select_instance(
    catalog: &dyn InstanceCatalog,
    ctx: &ProviderContext,
    payload_bytes: u64,
) -> VawsResult<InstanceSelection> {
    let entries = catalog.describe_instance_types(ctx, &GENERAL_PURPOSE_INSTANCE_TYPES)?;
    debug!(
        candidates = entries.len(),
        payload_bytes, "fetched instance catalog"
    );

    let selection = select_from(&entries, payload_bytes, BASE_IMAGE_OVERHEAD_BYTES);
    match &selection {
        InstanceSelection::Selected(entry) => {
            debug!(instance_type = %entry.instance_type, "selected build instance");
        }
        InstanceSelection::Unresolved { required_bytes } => {
            warn!(
                required_mib = required_bytes / (1024 * 1024),
                "vaws only builds images on general-purpose t2 instances and the image is larger \
                 than the largest one available; pick an instance type manually and set it in \
                 the image configuration"
            );
        }
    }
    Ok(selection)
}
