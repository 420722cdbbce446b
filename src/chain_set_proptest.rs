#![cfg(test)]

// Property tests for ChainSet kept inside the crate so they can reach
// the internal invariant checker alongside the public API.

use crate::chain_set::{ChainSet, Position};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Contains(usize),
    Find(usize),
    Iterate,
    Clear,
    Swap,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Insert),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Contains),
            1 => idx.clone().prop_map(OpI::Find),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Swap),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<S>(pool: Vec<String>, ops: Vec<OpI>, make: impl Fn() -> ChainSet<String, S>)
where
    S: BuildHasher,
{
    let mut sut = make();
    let mut model: HashSet<String> = HashSet::new();
    // Positions for keys that have not been removed or cleared since.
    let mut live: Vec<(String, Position)> = Vec::new();
    let mut stale: Vec<Position> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i) => {
                let k = pool[i].clone();
                let already = model.contains(&k);
                let (pos, inserted) = sut.insert(k.clone());
                assert_eq!(inserted, !already, "insert must report prior membership");
                assert_eq!(pos.key(&sut), Some(&k), "position must resolve to the key");
                if inserted {
                    live.push((k.clone(), pos));
                }
                model.insert(k);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k.as_str());
                assert_eq!(removed, model.remove(k), "remove must report prior membership");
                assert!(!sut.contains(k.as_str()), "removed key must be absent");
                if removed {
                    if let Some(at) = live.iter().position(|(lk, _)| lk == k) {
                        let (_, pos) = live.swap_remove(at);
                        stale.push(pos);
                    }
                }
            }
            OpI::Contains(i) => {
                let k = &pool[i];
                assert_eq!(sut.contains(k.as_str()), model.contains(k));
                assert_eq!(sut.count(k.as_str()), usize::from(model.contains(k)));
            }
            OpI::Find(i) => {
                let k = &pool[i];
                match sut.find(k.as_str()) {
                    Some(pos) => {
                        assert!(model.contains(k), "find hit an absent key");
                        assert_eq!(pos.key(&sut), Some(k));
                    }
                    None => assert!(!model.contains(k), "find missed a present key"),
                }
            }
            OpI::Iterate => {
                let yielded: BTreeSet<String> = sut.iter().cloned().collect();
                let expected: BTreeSet<String> = model.iter().cloned().collect();
                assert_eq!(yielded, expected, "iteration must yield the member set");
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                stale.extend(live.drain(..).map(|(_, pos)| pos));
            }
            OpI::Swap => {
                // Swap with an empty set and back: contents must survive.
                let mut other = make();
                sut.swap(&mut other);
                assert!(sut.is_empty());
                sut.swap(&mut other);
            }
        }

        // Post-conditions after each op
        assert_eq!(sut.len(), model.len());
        assert_eq!(sut.is_empty(), model.is_empty());
        for &pos in &stale {
            assert_eq!(pos.key(&sut), None, "stale position must not resolve");
        }
        sut.check_invariants();
    }
}

// Property: state-machine equivalence against std's HashSet across random
// operation sequences. Invariants exercised:
// - insert reports prior membership and never double-stores;
// - remove reports prior membership; removed keys are gone;
// - contains/count/find parity with the model;
// - full traversal equals the model's member set;
// - clear empties; swap round-trips; stale positions never resolve;
// - the structural invariants (chaining, load factor) hold after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(pool, ops, ChainSet::new);
    }
}

// Collision variant using a constant hasher: every key lands in one
// bucket, so every operation exercises chain walking, interior unlinking,
// and chain relocation during rehash.
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

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(pool, ops, || ChainSet::with_hasher(ConstBuildHasher));
    }
}
