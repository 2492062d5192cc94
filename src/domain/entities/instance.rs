//! Instance catalog entities

const MIB: u64 = 1024 * 1024;

/// One machine type as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCatalogEntry {
    pub instance_type: String,
    /// Memory capacity in bytes
    pub memory_bytes: u64,
}

impl InstanceCatalogEntry {
    pub fn new(instance_type: impl Into<String>, memory_bytes: u64) -> Self {
        Self {
            instance_type: instance_type.into(),
            memory_bytes,
        }
    }

    /// Build an entry from the MiB figure the provider reports.
    pub fn from_mib(instance_type: impl Into<String>, memory_mib: u64) -> Self {
        Self::new(instance_type, memory_mib.saturating_mul(MIB))
    }
}

/// Outcome of choosing an instance type for an image build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSelection {
    /// A catalog entry fits the payload
    Selected(InstanceCatalogEntry),
    /// Nothing in the catalog is large enough; the user must pick one
    Unresolved { required_bytes: u64 },
}

impl InstanceSelection {
    pub fn instance_type(&self) -> Option<&str> {
        match self {
            InstanceSelection::Selected(entry) => Some(&entry.instance_type),
            InstanceSelection::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, InstanceSelection::Selected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mib_converts_to_bytes() {
        let entry = InstanceCatalogEntry::from_mib("t2.nano", 512);
        assert_eq!(entry.memory_bytes, 512 * 1024 * 1024);
    }

    #[test]
    fn unresolved_has_no_instance_type() {
        let selection = InstanceSelection::Unresolved { required_bytes: 1 };
        assert_eq!(selection.instance_type(), None);
        assert!(!selection.is_resolved());
    }
}
