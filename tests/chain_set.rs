// ChainSet public-API test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Set semantics: each distinct key is stored at most once; re-insert
//   reports `false` and changes nothing.
// - Membership: contains/count/find/get agree with the insert/remove
//   history; misses are values, not errors.
// - Growth: capacity only increases under insert and the load-factor
//   bound holds after every size change; only clear resets it.
// - Iteration: a full traversal yields exactly the member set.
// - Equality: order-independent set equality.
use chain_set::{ChainSet, Position};
use std::collections::BTreeSet;
use std::hash::{BuildHasher, Hasher};

// Test: bulk load of 1..=1000 distinct integers on default parameters
// (minimum capacity 7, load factor 0.7).
// Verifies: final size 1000, no key lost, no duplicate yielded.
#[test]
fn thousand_distinct_integers() {
    let mut s = ChainSet::new();
    for k in 1..=1000 {
        let (_, inserted) = s.insert(k);
        assert!(inserted, "key {k} reported as duplicate");
    }
    assert_eq!(s.len(), 1000);
    for k in 1..=1000 {
        assert_eq!(s.count(&k), 1, "key {k} lost");
    }
    assert_eq!(s.count(&0), 0);
    assert_eq!(s.count(&1001), 0);

    let yielded: Vec<i32> = s.iter().copied().collect();
    let distinct: BTreeSet<i32> = yielded.iter().copied().collect();
    assert_eq!(yielded.len(), 1000, "duplicate key yielded by iteration");
    assert_eq!(distinct.len(), 1000);
}

// Test: growth invariant observed from outside.
// Assumes: capacity() reports the bucket count.
// Verifies: after every size change, len <= capacity * 0.7, and capacity
// is monotonically non-decreasing across inserts and removes.
#[test]
fn load_factor_bound_and_monotone_capacity() {
    let mut s = ChainSet::new();
    let mut last_capacity = s.capacity();
    for k in 0..300 {
        s.insert(k);
        assert!(s.len() as f64 <= s.capacity() as f64 * 0.7);
        assert!(s.capacity() >= last_capacity);
        last_capacity = s.capacity();
    }
    for k in 0..300 {
        s.remove(&k);
        assert_eq!(s.capacity(), last_capacity, "remove must never shrink");
    }
    assert!(s.is_empty());
}

// Test: erase scenario from a small working set.
// Verifies: erase "b" makes it unfindable while "a" and "c" survive.
#[test]
fn erase_middle_key() {
    let mut s = ChainSet::from(["a", "b", "c"]);
    assert!(s.remove("b"));
    assert!(s.find("b").is_none());
    assert!(s.find("a").is_some());
    assert!(s.find("c").is_some());
    assert_eq!(s.len(), 2);
}

// Test: list construction deduplicates.
// Verifies: {5,5,5,1} has size 2.
#[test]
fn construction_from_list_deduplicates() {
    let s = ChainSet::from([5, 5, 5, 1]);
    assert_eq!(s.len(), 2);
}

// Test: range construction (the pair-of-endpoints form) via collect.
// Verifies: all keys of the range are present, duplicates collapsed.
#[test]
fn construction_from_range() {
    let s: ChainSet<u32> = (0..64).chain(32..64).collect();
    assert_eq!(s.len(), 64);
    for k in 0..64 {
        assert!(s.contains(&k));
    }
}

// Test: clear-then-reuse behaves like a fresh set.
// Verifies: size 0 after clear; a subsequent insert is a genuine insert.
#[test]
fn clear_then_insert_like_fresh() {
    let mut s: ChainSet<i32> = (0..100).collect();
    s.clear();
    assert_eq!(s.len(), 0);
    assert!(!s.contains(&1));
    let (pos, inserted) = s.insert(1);
    assert!(inserted);
    assert_eq!(pos.key(&s), Some(&1));
    assert_eq!(s.len(), 1);
}

// Test: positions minted by insert and find agree and outlive rehashes.
// Assumes: a position is tied to its entry, not to the bucket layout.
// Verifies: the position resolves to its key across growth, and stops
// resolving after the key is removed.
#[test]
fn positions_survive_growth_and_die_with_their_key() {
    let mut s = ChainSet::new();
    let (p_insert, _) = s.insert("stable".to_string());
    for k in 0..500 {
        s.insert(format!("filler{k}"));
    }
    let p_find: Position = s.find("stable").unwrap();
    assert_eq!(p_insert.key(&s), p_find.key(&s));
    assert_eq!(p_insert.key(&s), Some(&"stable".to_string()));

    s.remove("stable");
    assert_eq!(p_insert.key(&s), None);
    assert_eq!(p_find.key(&s), None);
}

// Test: equality semantics across differently-built sets.
// Verifies: reflexive, symmetric, order-insensitive; subset inequality;
// inequality after divergence and re-convergence after repair.
#[test]
fn set_equality() {
    let a: ChainSet<i32> = [1, 2, 3].into();
    let mut b: ChainSet<i32> = [3, 1, 2].into();
    assert_eq!(a, b);
    assert_eq!(b, a);

    b.remove(&2);
    assert_ne!(a, b);
    b.insert(2);
    assert_eq!(a, b);

    let c: ChainSet<i32> = [1, 2].into();
    assert_ne!(a, c);
}

// Test: extend skips keys already present.
// Verifies: overlapping bulk inserts produce the union, sized correctly.
#[test]
fn extend_skips_existing() {
    let mut s: ChainSet<i32> = (0..10).collect();
    s.extend(5..15);
    assert_eq!(s.len(), 15);
    for k in 0..15 {
        assert!(s.contains(&k));
    }
}

// Test: collision pile-up under a degenerate hasher.
// Assumes: a constant hasher chains every key in one bucket.
// Verifies: membership, removal, and iteration all still behave; growth
// keeps the load bound even though chains stay long.
#[test]
fn degenerate_hasher_still_correct() {
    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    let mut s: ChainSet<u32, ConstBuildHasher> = ChainSet::with_hasher(ConstBuildHasher);
    for k in 0..100 {
        s.insert(k);
    }
    assert_eq!(s.len(), 100);
    for k in (0..100).step_by(2) {
        assert!(s.remove(&k));
    }
    assert_eq!(s.len(), 50);
    let yielded: BTreeSet<u32> = s.iter().copied().collect();
    let expected: BTreeSet<u32> = (0..100).filter(|k| k % 2 == 1).collect();
    assert_eq!(yielded, expected);
}

// Test: the diagnostic dump smoke test.
// Assumes: the format is unstable; only coarse shape is asserted.
// Verifies: a header, one line per bucket, the end marker, and one chain
// arrow per stored key.
#[test]
fn dump_shape() {
    let mut s = ChainSet::new();
    for k in [10, 20, 30] {
        s.insert(k);
    }
    let mut out = String::new();
    s.dump(&mut out).unwrap();
    assert!(out.starts_with("len = 3 capacity = "));
    assert!(out.ends_with("end\n"));
    assert_eq!(out.lines().count(), 1 + s.capacity() + 1);
    assert_eq!(out.matches("-> ").count(), 3);
}

// Test: Debug renders like a set.
#[test]
fn debug_format() {
    let s = ChainSet::from([7]);
    assert_eq!(format!("{s:?}"), "{7}");
}

// Test: pre-sizing avoids rehash churn.
// Verifies: with_capacity(n) admits n keys without growing when n fits
// under the load bound.
#[test]
fn with_capacity_presizes() {
    let mut s: ChainSet<i32> = ChainSet::with_capacity(2000);
    let cap = s.capacity();
    assert!(cap >= 2000);
    for k in 0..1000 {
        s.insert(k);
    }
    assert_eq!(s.capacity(), cap, "no rehash expected below the load bound");
}

// Test: borrowed lookups (store String, query &str).
#[test]
fn borrowed_lookup_with_str() {
    let mut s = ChainSet::new();
    s.insert("hello".to_string());
    assert!(s.contains("hello"));
    assert!(!s.contains("world"));
    assert!(s.find("hello").is_some());
    assert_eq!(s.get("hello"), Some(&"hello".to_string()));
    assert!(s.take("world").is_none());
}
