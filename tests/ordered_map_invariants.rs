//! OrderedMap Invariant Tests
//!
//! Property tests for the balanced tree:
//! - Balance factor stays in {-1, 0, 1} after every insert
//! - Height stays logarithmic
//! - Ascending traversal equals a stable sort of the input
//! - Duplicate keys come back newest first

use chirpdb::index::OrderedMap;
use proptest::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

/// Upper bound on AVL height for `n` nodes, leaves counted as height 1.
fn height_bound(n: usize) -> f64 {
    1.45 * ((n + 2) as f64).log2()
}

/// Expected ascending order: sort by key, later inserts first among equals.
fn expected_order(pairs: &[(u16, usize)]) -> Vec<(u16, usize)> {
    let mut expected = pairs.to_vec();
    expected.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    expected
}

// =============================================================================
// Fixed Scenarios
// =============================================================================

/// Order fidelity on a small hand-picked set.
#[test]
fn test_order_fidelity() {
    let map: OrderedMap<u32, ()> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, ())).collect();
    let keys: Vec<u32> = map.ascending().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
}

/// Sorted input is the worst case for an unbalanced tree.
#[test]
fn test_sorted_input_stays_balanced() {
    let mut map = OrderedMap::new();
    for key in 0..10_000u32 {
        map.insert(key, key);
    }
    assert!(map.check_invariants().is_ok());
    assert!(f64::from(map.height()) <= height_bound(map.len()));
    assert_eq!(map.get(&4_321), Some(&4_321));
}

/// Equal keys: `get` is the newest, `get_all` lists newest first.
#[test]
fn test_duplicate_keys_newest_first() {
    let mut map = OrderedMap::new();
    map.insert("tag", 1);
    map.insert("other", 0);
    map.insert("tag", 2);
    map.insert("tag", 3);

    assert_eq!(map.len(), 4);
    assert_eq!(map.get(&"tag"), Some(&3));
    assert_eq!(map.get_all(&"tag"), vec![&3, &2, &1]);
    assert_eq!(map.count(&"tag"), 3);
    assert_eq!(map.count(&"missing"), 0);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Every prefix of an insert sequence satisfies the balance invariant.
    #[test]
    fn prop_balanced_after_every_insert(keys in prop::collection::vec(any::<i32>(), 0..300)) {
        let mut map = OrderedMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(*key, i);
            prop_assert!(map.check_invariants().is_ok());
            prop_assert!(f64::from(map.height()) <= height_bound(map.len()));
        }
        prop_assert_eq!(map.len(), keys.len());
    }

    /// Traversal matches a sort of the inserted pairs, duplicates included.
    #[test]
    fn prop_traversal_matches_sort(keys in prop::collection::vec(0u16..64, 0..200)) {
        let pairs: Vec<(u16, usize)> = keys.iter().copied().zip(0..).collect();
        let map: OrderedMap<u16, usize> = pairs.iter().copied().collect();

        let ascending: Vec<(u16, usize)> = map.ascending().map(|(k, v)| (*k, *v)).collect();
        let expected = expected_order(&pairs);
        prop_assert_eq!(&ascending, &expected);

        let mut descending: Vec<(u16, usize)> = map.descending().map(|(k, v)| (*k, *v)).collect();
        descending.reverse();
        prop_assert_eq!(descending, expected);
    }

    /// Every inserted key can be found, and `get` returns its latest value.
    #[test]
    fn prop_round_trip(keys in prop::collection::vec(0u16..128, 1..200)) {
        let pairs: Vec<(u16, usize)> = keys.iter().copied().zip(0..).collect();
        let map: OrderedMap<u16, usize> = pairs.iter().copied().collect();

        for (key, _) in &pairs {
            let latest = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| *v).max();
            prop_assert_eq!(map.get(key).copied(), latest);
            prop_assert_eq!(
                map.count(key),
                pairs.iter().filter(|(k, _)| k == key).count()
            );
        }
    }
}
