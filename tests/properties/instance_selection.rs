//! Property tests for build instance selection.

use proptest::prelude::*;

use vaws::domain::entities::{InstanceCatalogEntry, InstanceSelection};
use vaws::domain::services::select_from;

fn catalog() -> impl Strategy<Value = Vec<InstanceCatalogEntry>> {
    proptest::collection::vec(1u64..65_536, 0..10).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(i, mib)| InstanceCatalogEntry::from_mib(format!("t2.type{}", i), mib))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the selection is the smallest entry with room to spare, and
    /// `Unresolved` only when no entry has room.
    #[test]
    fn property_selection_is_smallest_fitting(
        entries in catalog(),
        payload in 0u64..(64u64 << 30),
        overhead in 0u64..(8u64 << 30),
    ) {
        let required = payload + overhead;
        match select_from(&entries, payload, overhead) {
            InstanceSelection::Selected(chosen) => {
                prop_assert!(chosen.memory_bytes > required);
                prop_assert!(entries
                    .iter()
                    .filter(|e| e.memory_bytes > required)
                    .all(|e| e.memory_bytes >= chosen.memory_bytes));
            }
            InstanceSelection::Unresolved { required_bytes } => {
                prop_assert_eq!(required_bytes, required);
                prop_assert!(entries.iter().all(|e| e.memory_bytes <= required));
            }
        }
    }
}
