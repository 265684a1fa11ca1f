//! Property-based tests for tag ID resolution
//!
//! Markers are normally `static` items; here every case leaks a fresh set so
//! that arbitrary tag lists can be resolved without colliding with bindings
//! from earlier cases.
//!
//! Properties tested:
//! 1. Equal strings in a table share an ID, distinct strings never do
//! 2. IDs of a table are exactly `[offset, offset + distinct)`
//! 3. Ranges of different tables never overlap
//! 4. Key-ordered layouts do not depend on registration order

use eprofiler::{named_scope, Marker, Resolver, ResolverConfig, Table, TableKey, Tag};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

named_scope!(Left = "prop/left");
named_scope!(Right = "prop/right");

fn leak_markers<S: eprofiler::Scope>(tags: &[String]) -> Vec<&'static Marker<S>> {
    tags.iter()
        .map(|tag| {
            let value: &'static str = Box::leak(tag.clone().into_boxed_str());
            &*Box::leak(Box::new(Marker::new(Tag::new(value))))
        })
        .collect()
}

fn tag_list() -> impl Strategy<Value = Vec<String>> {
    // Small alphabet so repeated tags are common
    prop::collection::vec("[a-d]{1,2}", 0..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_equal_tags_share_ids(tags in tag_list()) {
        let markers = leak_markers::<Left>(&tags);
        let mut resolver = Resolver::new();
        resolver.declare(&markers);
        resolver.finalize().unwrap();

        let mut by_tag: HashMap<&str, usize> = HashMap::new();
        let mut seen_ids: HashSet<usize> = HashSet::new();
        for marker in &markers {
            let id = marker.id().unwrap();
            match by_tag.get(marker.tag().as_str()) {
                Some(existing) => {
                    prop_assert_eq!(*existing, id);
                }
                None => {
                    // A new string never reuses an ID
                    prop_assert!(seen_ids.insert(id));
                    by_tag.insert(marker.tag().as_str(), id);
                }
            }
        }
    }

    #[test]
    fn prop_ids_are_dense(tags in tag_list(), base in 0usize..1000) {
        let markers = leak_markers::<Left>(&tags);
        let mut resolver = Resolver::with_config(ResolverConfig {
            base_offset: base,
            ..ResolverConfig::default()
        });
        resolver.table::<Left>().declare(&markers);
        let layout = resolver.finalize().unwrap();

        let distinct: HashSet<&String> = tags.iter().collect();
        let entry = layout.table_for::<Left>().unwrap();
        prop_assert_eq!(entry.offset(), base);
        prop_assert_eq!(entry.len(), distinct.len());

        let ids: HashSet<usize> = markers.iter().map(|m| m.id().unwrap()).collect();
        let expected: HashSet<usize> = entry.range().collect();
        prop_assert_eq!(ids, expected);

        let table: Table<Left, u8, usize> = Table::new(&layout).unwrap();
        prop_assert_eq!(table.keys().len(), table.value_store().len());
        for marker in &markers {
            prop_assert_eq!(table.key_of(marker.id().unwrap()), Some(marker.tag().as_str()));
        }
    }

    #[test]
    fn prop_tables_are_disjoint(left in tag_list(), right in tag_list()) {
        let left_markers = leak_markers::<Left>(&left);
        let right_markers = leak_markers::<Right>(&right);
        let mut resolver = Resolver::new();
        resolver.declare(&left_markers).declare(&right_markers);
        let layout = resolver.finalize().unwrap();

        let l = layout.table(&TableKey::Named("prop/left")).map(|t| t.range());
        let r = layout.table(&TableKey::Named("prop/right")).map(|t| t.range());
        if let (Some(l), Some(r)) = (l, r) {
            prop_assert!(l.end <= r.start || r.end <= l.start);
        }

        let left_ids: HashSet<usize> = left_markers.iter().map(|m| m.id().unwrap()).collect();
        prop_assert!(right_markers.iter().all(|m| !left_ids.contains(&m.id().unwrap())));
        prop_assert_eq!(layout.total_ids(), left_ids.len() + right.iter().collect::<HashSet<_>>().len());
    }

    #[test]
    fn prop_key_order_is_registration_independent(left in tag_list(), right in tag_list()) {
        let first = {
            let mut resolver = Resolver::with_config(ResolverConfig::deterministic());
            resolver
                .declare(&leak_markers::<Left>(&left))
                .declare(&leak_markers::<Right>(&right));
            resolver.finalize().unwrap()
        };
        let second = {
            let mut resolver = Resolver::with_config(ResolverConfig::deterministic());
            resolver
                .declare(&leak_markers::<Right>(&right))
                .declare(&leak_markers::<Left>(&left));
            resolver.finalize().unwrap()
        };

        prop_assert_eq!(first.tables(), second.tables());
    }
}
