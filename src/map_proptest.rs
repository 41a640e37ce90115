#![cfg(test)]

// Property tests for the map variants kept inside the crate so they can
// reach the structural invariant checkers and slot introspection.

use crate::{BackwardShiftMap, Options, RobinHoodMap, TombstoneMap};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Emplace(usize),
    Contains(String),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> String {
    pool[i].clone()
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Emplace),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Worst-case hasher: every key collides, so probe runs span the table and
// deletion policies are exercised continuously.
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

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences, on a small
// initial table so growth and wraparound happen often:
// - insert is last-write-wins; emplace returns the latest value.
// - remove(k) is true iff the model held k; emplace(k) is None right
//   after, and a second remove(k) returns false (idempotent removal).
// - len/is_empty parity after every op; live + tombstones never exceeds
//   capacity; tombstone-free variants report zero tombstones throughout.
// - the structural checker passes after every op: counts match slots,
//   at least one Empty slot, every key reachable on its own probe path,
//   stored PSLs equal actual displacement (Robin Hood).
macro_rules! state_machine_props {
    ($name:ident, $map:ty, $new:expr, $tombstones_allowed:expr) => {
        proptest! {
            #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
            #[test]
            fn $name((pool, ops) in arb_scenario()) {
                let mut sut: $map = $new;
                let mut model: HashMap<String, i32> = HashMap::new();

                for op in ops {
                    match op {
                        OpI::Insert(i, v) => {
                            let k = key_from(&pool, i);
                            sut.insert(k.clone(), v);
                            model.insert(k, v);
                        }
                        OpI::Remove(i) => {
                            let k = key_from(&pool, i);
                            let removed = sut.remove(k.as_str());
                            prop_assert_eq!(removed, model.remove(&k).is_some());
                            prop_assert_eq!(sut.emplace(k.as_str()), None);
                            prop_assert!(!sut.remove(k.as_str()), "second remove must be a no-op");
                        }
                        OpI::Emplace(i) => {
                            let k = key_from(&pool, i);
                            prop_assert_eq!(sut.emplace(&k), model.get(&k));
                        }
                        OpI::Contains(s) => {
                            prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
                        }
                        OpI::Iterate => {
                            let got: BTreeMap<String, i32> =
                                sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                            let want: BTreeMap<String, i32> =
                                model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                            prop_assert_eq!(got, want);
                        }
                    }

                    // Post-conditions after each op
                    prop_assert_eq!(sut.len(), model.len());
                    prop_assert_eq!(sut.is_empty(), model.is_empty());
                    prop_assert!(sut.len() + sut.tombstone_count() <= sut.capacity());
                    if !$tombstones_allowed {
                        prop_assert_eq!(sut.tombstone_count(), 0);
                    }
                    sut.assert_invariants();
                }
            }
        }
    };
}

const SMALL: Options = Options {
    initial_capacity: 4,
    load_factor: 0.6,
};

state_machine_props!(
    prop_tombstone_state_machine,
    TombstoneMap<String, i32>,
    TombstoneMap::with_options(SMALL),
    true
);
state_machine_props!(
    prop_backward_shift_state_machine,
    BackwardShiftMap<String, i32>,
    BackwardShiftMap::with_options(SMALL),
    false
);
state_machine_props!(
    prop_robin_hood_state_machine,
    RobinHoodMap<String, i32>,
    RobinHoodMap::with_options(SMALL),
    false
);

// Same invariants under total hash collision: every probe run is maximal,
// which stresses tombstone skipping, backward-shift legality, and the
// Robin Hood swap rule far harder than a fair hasher.
state_machine_props!(
    prop_tombstone_all_collisions,
    TombstoneMap<String, i32, ConstBuildHasher>,
    TombstoneMap::with_options_and_hasher(SMALL, ConstBuildHasher),
    true
);
state_machine_props!(
    prop_backward_shift_all_collisions,
    BackwardShiftMap<String, i32, ConstBuildHasher>,
    BackwardShiftMap::with_options_and_hasher(SMALL, ConstBuildHasher),
    false
);
state_machine_props!(
    prop_robin_hood_all_collisions,
    RobinHoodMap<String, i32, ConstBuildHasher>,
    RobinHoodMap::with_options_and_hasher(SMALL, ConstBuildHasher),
    false
);

// Property: Robin Hood displacement conserves total PSL. For an identical
// insert-only key sequence (same hasher instance, same options, so growth
// happens at the same points), the sum of probe-sequence lengths equals
// plain linear probing's; only the variance is redistributed.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_robin_hood_conserves_psl_sum(keys in proptest::collection::vec(any::<u64>(), 0..300)) {
        let opts = Options { initial_capacity: 8, load_factor: 0.7 };
        let hasher = ahash::RandomState::new();
        let mut linear: TombstoneMap<u64, u64, ahash::RandomState> =
            TombstoneMap::with_options_and_hasher(opts, hasher.clone());
        let mut robin: RobinHoodMap<u64, u64, ahash::RandomState> =
            RobinHoodMap::with_options_and_hasher(opts, hasher);

        for (i, k) in keys.iter().enumerate() {
            linear.insert(*k, i as u64);
            robin.insert(*k, i as u64);
        }

        prop_assert_eq!(linear.len(), robin.len());
        prop_assert_eq!(linear.capacity(), robin.capacity());
        prop_assert_eq!(linear.psl_sum(), robin.psl_sum());

        let a: BTreeMap<u64, u64> = linear.iter().map(|(k, v)| (*k, *v)).collect();
        let b: BTreeMap<u64, u64> = robin.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(a, b);
        robin.assert_invariants();
        linear.assert_invariants();
    }
}

// Property: a resize triggered mid-sequence preserves set equality. The
// snapshot taken just below the threshold equals the post-growth contents
// minus the entry that triggered the growth.
proptest! {
    #[test]
    fn prop_resize_preserves_set_equality(seed in any::<u64>()) {
        let mut m: RobinHoodMap<u64, u64> = RobinHoodMap::with_options(Options {
            initial_capacity: 8,
            load_factor: 0.5,
        });
        let mut x = seed;
        let mut next = move || {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            x
        };

        while m.len() < 4 {
            let k = next();
            m.insert(k, k ^ 1);
        }
        let before: BTreeMap<u64, u64> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(m.capacity(), 8);

        let (k, v) = (next(), 7);
        m.insert(k, v); // crosses the threshold and grows
        prop_assert!(m.capacity() > 8);

        let mut after: BTreeMap<u64, u64> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(after.remove(&k), Some(v));
        prop_assert_eq!(after, before);
        m.assert_invariants();
    }
}
