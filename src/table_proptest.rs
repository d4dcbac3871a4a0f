#![cfg(test)]

// Property tests for Table kept inside the crate so they can check the
// chain/list invariants after every operation.

use crate::table::Table;
use crate::test_util::ConstBuildHasher;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Merge(Vec<(usize, i32)>),
    Retain(i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            1 => proptest::collection::vec((idx.clone(), any::<i32>()), 0..12).prop_map(OpI::Merge),
            1 => (1..5i32).prop_map(OpI::Retain),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..160).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Insertion-ordered reference model.
#[derive(Default)]
struct Model {
    map: HashMap<Vec<u8>, i32>,
    order: Vec<Vec<u8>>,
}

impl Model {
    fn set(&mut self, k: &[u8], v: i32) -> Option<i32> {
        let prev = self.map.insert(k.to_vec(), v);
        if prev.is_none() {
            self.order.push(k.to_vec());
        }
        prev
    }

    fn remove(&mut self, k: &[u8]) -> Option<i32> {
        let prev = self.map.remove(k)?;
        self.order.retain(|o| o != k);
        Some(prev)
    }

    fn entries(&self) -> Vec<(Vec<u8>, i32)> {
        self.order.iter().map(|k| (k.clone(), self.map[k])).collect()
    }
}

fn run<S: BuildHasher + Clone>(
    pool: &[String],
    ops: Vec<OpI>,
    mut sut: Table<i32, S>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    let mut max_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = pool[i].as_bytes();
                let got = sut.set(k, v).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(got, model.set(k, v), "set must return the previous value");
            }
            OpI::Remove(i) => {
                let k = pool[i].as_bytes();
                prop_assert_eq!(sut.remove(k), model.remove(k));
            }
            OpI::Get(i) => {
                let k = pool[i].as_bytes();
                prop_assert_eq!(sut.get(k), model.map.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.map.contains_key(s.as_bytes()));
            }
            OpI::Merge(pairs) => {
                let mut src = Table::new();
                let mut src_model = Model::default();
                for (i, v) in pairs {
                    src.set(&pool[i], v).map_err(|e| TestCaseError::fail(e.to_string()))?;
                    src_model.set(pool[i].as_bytes(), v);
                }
                let src_before: Vec<(Vec<u8>, i32)> =
                    src.iter().map(|(k, v)| (k.to_vec(), *v)).collect();

                let evicted = sut.merge(&src).map_err(|e| TestCaseError::fail(e.to_string()))?;
                let mut expected_evicted = Vec::new();
                for (k, v) in src_model.entries() {
                    if let Some(old) = model.set(&k, v) {
                        expected_evicted.push(old);
                    }
                }
                prop_assert_eq!(evicted, expected_evicted);

                let src_after: Vec<(Vec<u8>, i32)> =
                    src.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
                prop_assert_eq!(src_before, src_after, "merge must not touch the source");
            }
            OpI::Retain(m) => {
                sut.retain(|_, v| v.rem_euclid(m) == 0);
                let drop_keys: Vec<Vec<u8>> = model
                    .entries()
                    .into_iter()
                    .filter(|(_, v)| v.rem_euclid(m) != 0)
                    .map(|(k, _)| k)
                    .collect();
                for k in drop_keys {
                    model.remove(&k);
                }
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model = Model::default();
                prop_assert_eq!(sut.capacity(), cap, "clear keeps capacity");
            }
            OpI::Iterate => {
                let forward: Vec<(Vec<u8>, i32)> =
                    sut.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
                prop_assert_eq!(&forward, &model.entries());
                let mut backward: Vec<(Vec<u8>, i32)> =
                    sut.iter().rev().map(|(k, v)| (k.to_vec(), *v)).collect();
                backward.reverse();
                prop_assert_eq!(&backward, &forward);
            }
        }

        // Post-conditions after each op
        sut.validate();
        prop_assert_eq!(sut.len(), model.map.len());
        prop_assert!(sut.capacity() >= max_capacity, "capacity never shrinks");
        max_capacity = sut.capacity();
        let keys: Vec<Vec<u8>> = sut.keys().map(<[u8]>::to_vec).collect();
        prop_assert_eq!(keys, model.order.clone());
    }
    Ok(())
}

// Property: state-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - `set` returns the replaced value; updates keep position, inserts append.
// - `remove`/`get`/`contains` agree with the model.
// - `merge` applies the source in its order, returns evicted values and
//   leaves the source untouched.
// - Forward and reverse iteration agree with the model order.
// - Chains and the order list stay consistent (`validate`) after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(&pool, ops, Table::new())?;
    }
}

// Small initial capacity so growth happens within a few inserts.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_from_one_bucket((pool, ops) in arb_scenario()) {
        let sut = Table::try_with_capacity_and_hasher(1, crate::hash::BuildFnv1a).unwrap();
        run(&pool, ops, sut)?;
    }
}

// Collision variant using a constant hasher to stress chain unlinking.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(&pool, ops, Table::with_hasher(ConstBuildHasher))?;
    }
}

// Property: keys inserted in sequence come back in that sequence no matter
// how many resizes happen in between.
proptest! {
    #[test]
    fn prop_order_survives_growth(keys in proptest::collection::hash_set(any::<Vec<u8>>(), 0..400)) {
        let keys: Vec<Vec<u8>> = keys.into_iter().collect();
        let mut t = Table::new();
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.set(k, i), Ok(None));
        }
        let got: Vec<Vec<u8>> = t.keys().map(<[u8]>::to_vec).collect();
        prop_assert_eq!(got, keys);
        prop_assert!(t.load_factor() <= crate::table::MAX_LOAD_FACTOR);
        t.validate();
    }
}
