//! Deterministic stress runs that check the red-black invariants after every
//! mutation: ascending and descending fills, interleaved deletions, and
//! deletions of nodes with two children.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{Config, LevelFilter, TestLogger};
use stable_rbtree::TreeMap;

fn init_logging() {
    // Several tests race to install the logger; only the first one wins.
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn keys_of(map: &TreeMap<i32, i32>) -> Vec<i32> {
    map.keys().cloned().collect()
}

// Worst-case red-black height for n entries.
fn height_bound(n: usize) -> usize {
    2 * (((n + 1) as f64).log2().ceil() as usize)
}

#[test]
fn ascending_fill() {
    init_logging();
    let mut map = TreeMap::new();
    for i in 0..1000 {
        assert!(map.insert((i, i * 10)).1);
        map.assert_invariants();
        assert_eq!(map.len(), (i + 1) as usize);
    }
    assert!(map.height() <= height_bound(map.len()), "height {} too large", map.height());
    assert_eq!(keys_of(&map), (0..1000).collect::<Vec<_>>());
}

#[test]
fn descending_fill() {
    init_logging();
    let mut map = TreeMap::new();
    for i in (0..1000).rev() {
        assert!(map.insert((i, -i)).1);
        map.assert_invariants();
    }
    assert!(map.height() <= height_bound(map.len()));
    for i in 0..1000 {
        assert_eq!(map.at(&i), Ok(&-i));
    }
}

#[test]
fn interleaved_deletions() {
    init_logging();
    let mut map: TreeMap<i32, i32> = (0..512).map(|i| (i, i)).collect();
    map.assert_invariants();

    // Remove every other key, then every fourth of what remains.
    for i in (0..512).step_by(2) {
        assert_eq!(map.remove(&i), Some(i));
        map.assert_invariants();
    }
    assert_eq!(map.len(), 256);
    for i in (1..512).step_by(4) {
        assert_eq!(map.remove(&i), Some(i));
        map.assert_invariants();
    }
    assert_eq!(map.len(), 128);
    assert_eq!(keys_of(&map), (3..512).step_by(4).collect::<Vec<_>>());
}

#[test]
fn drain_from_the_middle() {
    init_logging();
    let mut map: TreeMap<i32, i32> = (0..300).map(|i| (i, i)).collect();
    let mut expected: Vec<i32> = (0..300).collect();

    // The middle entry sits high in the tree and usually has two children.
    while !map.is_empty() {
        let pos = {
            let mut cursor = map.begin();
            for _ in 0..map.len() / 2 {
                cursor.move_next().unwrap();
            }
            cursor.position()
        };
        let (key, _) = map.erase(pos).unwrap().into_parts();
        expected.retain(|&k| k != key);
        map.assert_invariants();
        assert_eq!(keys_of(&map), expected);
    }
    assert!(map.begin() == map.end());
}

#[test]
fn duplicates_change_nothing() {
    init_logging();
    let mut map: TreeMap<i32, i32> = (0..64).map(|i| (i, i)).collect();
    for i in 0..64 {
        let (cursor, inserted) = map.insert((i, 1000));
        assert!(!inserted);
        assert_eq!(cursor.value(), Ok(&i));
    }
    assert_eq!(map.len(), 64);
    map.assert_invariants();
}

#[test]
fn randomized_against_sorted_vec() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut map = TreeMap::new();
    let mut ctrl: Vec<i32> = Vec::new();

    for round in 0..4000 {
        let k = rng.gen_range(0..500);
        if rng.gen_bool(0.55) {
            let inserted = map.insert((k, round)).1;
            assert_eq!(inserted, ctrl.binary_search(&k).is_err());
            if let Err(at) = ctrl.binary_search(&k) {
                ctrl.insert(at, k);
            }
        } else {
            let removed = map.remove(&k).is_some();
            match ctrl.binary_search(&k) {
                Ok(at) => {
                    assert!(removed);
                    ctrl.remove(at);
                }
                Err(_) => assert!(!removed),
            }
        }
        map.assert_invariants();
        assert_eq!(map.len(), ctrl.len());
    }

    assert_eq!(keys_of(&map), ctrl);
    assert!(map.height() <= height_bound(map.len()));
}

#[test]
fn clear_then_reuse() {
    init_logging();
    let mut map: TreeMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    map.clear();
    map.assert_invariants();
    assert!(map.is_empty());
    for i in (0..50).rev() {
        map.insert((i, i));
    }
    map.assert_invariants();
    assert_eq!(map.len(), 50);
}

#[test]
fn copy_is_structurally_independent() {
    init_logging();
    let original: TreeMap<i32, i32> = (0..200).map(|i| (i, i)).collect();
    let mut copy = original.clone();

    for i in (0..200).filter(|i| i % 3 == 0) {
        copy.remove(&i);
    }
    for v in copy.values_mut() {
        *v = -1;
    }
    copy.insert((1000, 1000));
    copy.assert_invariants();

    original.assert_invariants();
    assert_eq!(original.len(), 200);
    for (i, (&k, &v)) in original.iter().enumerate() {
        assert_eq!(k, i as i32);
        assert_eq!(v, i as i32);
    }
}
