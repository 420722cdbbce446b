// Black-box property tests for ChainSet over the public API only.
// The richer state-machine suite (with internal invariant checks) lives
// inside the crate; these confirm the published contract holds for
// arbitrary key sequences.

use chain_set::ChainSet;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    // Property: after inserting each key of an arbitrary sequence once,
    // size equals the number of distinct keys, count(k) == 1 for every
    // inserted key, and iteration yields exactly the distinct keys.
    #[test]
    fn insert_sequence_matches_distinct_keys(keys in proptest::collection::vec(any::<u16>(), 0..200)) {
        let mut s = ChainSet::new();
        for &k in &keys {
            s.insert(k);
        }
        let distinct: HashSet<u16> = keys.iter().copied().collect();
        prop_assert_eq!(s.len(), distinct.len());
        for k in &distinct {
            prop_assert_eq!(s.count(k), 1);
        }
        let yielded: HashSet<u16> = s.iter().copied().collect();
        prop_assert_eq!(yielded, distinct);
    }

    // Property: remove-then-count is 0 for any key, present or not, and
    // removal only ever shrinks the size by exactly one.
    #[test]
    fn remove_then_count_is_zero(
        keys in proptest::collection::vec(any::<u16>(), 0..100),
        victim in any::<u16>(),
    ) {
        let mut s: ChainSet<u16> = keys.iter().copied().collect();
        let before = s.len();
        let was_present = s.contains(&victim);
        let removed = s.remove(&victim);
        prop_assert_eq!(removed, was_present);
        prop_assert_eq!(s.count(&victim), 0);
        prop_assert_eq!(s.len(), before - usize::from(removed));
    }

    // Property: equality is insensitive to insertion order.
    #[test]
    fn equality_ignores_insertion_order(keys in proptest::collection::vec(any::<u8>(), 0..64)) {
        let forward: ChainSet<u8> = keys.iter().copied().collect();
        let reverse: ChainSet<u8> = keys.iter().rev().copied().collect();
        prop_assert_eq!(&forward, &reverse);
        prop_assert_eq!(&reverse, &forward);
    }

    // Property: a clone equals its source and shares no state with it.
    #[test]
    fn clone_round_trip(keys in proptest::collection::vec(any::<u16>(), 0..100)) {
        let original: ChainSet<u16> = keys.iter().copied().collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        // Churn the copy back to the same member set; equality must hold.
        if let Some(&k) = keys.first() {
            copy.remove(&k);
            copy.insert(k);
        }
        prop_assert_eq!(&copy, &original);
    }
}
