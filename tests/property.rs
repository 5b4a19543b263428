//! Property-based tests: random operation sequences are replayed against
//! `std::collections::BTreeMap` and the two maps must agree after every
//! step, with the red-black invariants intact.

use proptest::prelude::*;
use stable_rbtree::TreeMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16, i32),
    Remove(i16),
    Lookup(i16),
    EraseAt(i16),
    Clear,
}

// Small keys so that removals and duplicate inserts actually hit.
fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            8 => (any::<i16>().prop_map(|k| k % 128), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            4 => any::<i16>().prop_map(|k| Op::Remove(k % 128)),
            2 => any::<i16>().prop_map(|k| Op::Lookup(k % 128)),
            2 => any::<i16>().prop_map(|k| Op::EraseAt(k % 128)),
            1 => Just(Op::Clear),
        ],
        0..max_ops,
    )
}

proptest! {
    #[test]
    fn matches_btreemap(ops in operations(400)) {
        let mut map: TreeMap<i16, i32> = TreeMap::new();
        let mut oracle: BTreeMap<i16, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let inserted = map.insert((k, v)).1;
                    let fresh = !oracle.contains_key(&k);
                    if fresh {
                        oracle.insert(k, v);
                    }
                    prop_assert_eq!(inserted, fresh);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), oracle.remove(&k));
                }
                Op::Lookup(k) => {
                    prop_assert_eq!(map.get(&k), oracle.get(&k));
                    prop_assert_eq!(map.count(&k), oracle.contains_key(&k) as usize);
                }
                Op::EraseAt(k) => {
                    let pos = map.find(&k).position();
                    match oracle.remove(&k) {
                        Some(v) => {
                            let erased = map.erase(pos).map(|p| p.into_parts());
                            prop_assert_eq!(erased, Ok((k, v)));
                        }
                        None => {
                            prop_assert!(pos.is_end());
                            prop_assert!(map.erase(pos).is_err());
                        }
                    }
                }
                Op::Clear => {
                    map.clear();
                    oracle.clear();
                }
            }

            map.assert_invariants();
            prop_assert_eq!(map.len(), oracle.len());
        }

        let ours: Vec<(i16, i32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let theirs: Vec<(i16, i32)> = oracle.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(ours, theirs);
    }

    #[test]
    fn iteration_is_sorted_both_ways(keys in prop::collection::vec(any::<i32>(), 0..300)) {
        let map: TreeMap<i32, ()> = keys.iter().map(|&k| (k, ())).collect();
        map.assert_invariants();

        let forward: Vec<i32> = map.keys().cloned().collect();
        let mut backward: Vec<i32> = map.keys().rev().cloned().collect();
        backward.reverse();

        let mut expected = keys.clone();
        expected.sort();
        expected.dedup();

        prop_assert_eq!(&forward, &expected);
        prop_assert_eq!(&backward, &expected);
        prop_assert_eq!(map.iter().len(), expected.len());
    }

    #[test]
    fn cursor_walk_matches_iter(keys in prop::collection::vec(any::<i32>(), 0..200)) {
        let map: TreeMap<i32, i32> = keys.iter().map(|&k| (k, k)).collect();

        let mut walked = Vec::new();
        let mut cursor = map.begin();
        while !cursor.is_end() {
            walked.push(*cursor.key().unwrap());
            cursor.move_next().unwrap();
        }
        prop_assert!(cursor.move_next().is_err());

        let mut back = Vec::new();
        while cursor.move_prev().is_ok() {
            back.push(*cursor.key().unwrap());
        }
        back.reverse();

        let iterated: Vec<i32> = map.keys().cloned().collect();
        prop_assert_eq!(&walked, &iterated);
        prop_assert_eq!(&back, &iterated);
    }

    #[test]
    fn clone_is_independent(
        keys in prop::collection::vec(any::<i32>(), 1..200),
        victims in prop::collection::vec(any::<prop::sample::Index>(), 0..50),
    ) {
        let original: TreeMap<i32, i32> = keys.iter().map(|&k| (k, k)).collect();
        let before: Vec<(i32, i32)> = original.iter().map(|(&k, &v)| (k, v)).collect();

        let mut copy = original.clone();
        for victim in victims {
            let k = keys[victim.index(keys.len())];
            copy.remove(&k);
        }
        for v in copy.values_mut() {
            *v = v.wrapping_add(1);
        }
        copy.assert_invariants();

        let after: Vec<(i32, i32)> = original.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(before, after);
    }
}
