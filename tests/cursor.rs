//! Cursor behaviour seen from outside the crate: traversal order, boundary
//! errors, and how positions behave once their entry or map has changed.

use simplelog::{Config, LevelFilter, TestLogger};
use stable_rbtree::{Error, Misuse, TreeMap};

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn sample() -> TreeMap<i32, String> {
    let mut map = TreeMap::new();
    for &k in &[5, 3, 8, 1, 4, 7, 9] {
        map.insert((k, format!("v{}", k)));
    }
    map
}

#[test]
fn begin_to_end_and_back() {
    init_logging();
    let map = sample();

    let mut forward = Vec::new();
    let mut cursor = map.begin();
    while cursor != map.end() {
        forward.push(*cursor.key().unwrap());
        cursor.move_next().unwrap();
    }
    assert_eq!(forward, vec![1, 3, 4, 5, 7, 8, 9]);

    let mut backward = Vec::new();
    let mut cursor = map.end();
    cursor.move_prev().unwrap();
    loop {
        backward.push(*cursor.key().unwrap());
        if cursor == map.begin() {
            break;
        }
        cursor.move_prev().unwrap();
    }
    forward.reverse();
    assert_eq!(backward, forward);
}

#[test]
fn postfix_steps_hand_back_prior_cursor() {
    let map = sample();
    let mut cursor = map.find(&8);

    let prior = cursor.fetch_next().unwrap();
    assert_eq!(prior.get(), Ok((&8, &"v8".to_string())));
    assert_eq!(cursor.key(), Ok(&9));

    let prior = cursor.fetch_next().unwrap();
    assert_eq!(prior.key(), Ok(&9));
    assert!(cursor.is_end());

    let prior = cursor.fetch_prev().unwrap();
    assert!(prior.is_end());
    assert_eq!(cursor.key(), Ok(&9));
}

#[test]
fn boundary_errors_leave_cursor_in_place() {
    init_logging();
    let map = sample();

    assert_eq!(map.at(&2), Err(Error::NotFound));
    assert_eq!(map.at(&4).map(String::as_str), Ok("v4"));

    let mut end = map.end();
    assert_eq!(end.move_next(), Err(Error::InvalidIterator(Misuse::PastTheEnd)));
    assert_eq!(end.value(), Err(Error::InvalidIterator(Misuse::PastTheEnd)));
    assert!(end.fetch_next().is_err());
    assert!(end == map.end());

    let mut begin = map.begin();
    assert_eq!(begin.move_prev(), Err(Error::InvalidIterator(Misuse::BeforeBegin)));
    assert!(begin == map.begin());
    assert_eq!(begin.key(), Ok(&1));
}

#[test]
fn find_missing_is_end() {
    let map = sample();
    assert!(map.find(&6) == map.end());
    assert_eq!(map.count(&6), 0);
    assert_eq!(map.count(&7), 1);
}

#[test]
fn erase_rejects_bad_positions() {
    init_logging();
    let mut map = sample();
    let other = sample();

    let end = map.end().position();
    assert!(end.is_end());
    assert_eq!(map.erase(end), Err(Error::InvalidIterator(Misuse::PastTheEnd)));

    let foreign = other.find(&5).position();
    assert_eq!(map.erase(foreign), Err(Error::InvalidIterator(Misuse::ForeignMap)));

    let five = map.find(&5).position();
    let (key, value) = map.erase(five).unwrap().into_parts();
    assert_eq!((key, value.as_str()), (5, "v5"));
    assert_eq!(map.erase(five), Err(Error::InvalidIterator(Misuse::Erased)));

    // Failed erasures never touched the map.
    assert_eq!(map.len(), 6);
    assert_eq!(other.len(), 7);
    map.assert_invariants();
}

#[test]
fn stale_position_does_not_see_reused_slot() {
    let mut map = sample();
    let three = map.find(&3).position();
    assert!(map.remove(&3).is_some());

    // The next insertion takes over the freed slot.
    map.insert((2, "v2".to_string()));
    assert!(map.cursor_at(three).is_err());
    assert_eq!(map.erase(three), Err(Error::InvalidIterator(Misuse::Erased)));
    assert_eq!(map.len(), 7);
}

#[test]
fn positions_of_survivors_stay_valid() {
    let mut map = sample();
    let positions: Vec<_> = [1, 3, 4, 7, 8, 9].iter().map(|k| (*k, map.find(k).position())).collect();

    // 5 is the root with two children; its successor 7 moves into its place.
    assert_eq!(map.remove(&5), Some("v5".to_string()));

    for (k, pos) in positions {
        let cursor = map.cursor_at(pos).unwrap();
        assert_eq!(cursor.key(), Ok(&k));
    }
}

#[test]
fn insert_returns_cursor_at_entry() {
    let mut map = sample();
    {
        let (mut cursor, inserted) = map.insert((6, "v6".to_string()));
        assert!(inserted);
        cursor.move_prev().unwrap();
        assert_eq!(cursor.key(), Ok(&5));
    }
    {
        let (cursor, inserted) = map.insert((6, "other".to_string()));
        assert!(!inserted);
        assert_eq!(cursor.value().map(String::as_str), Ok("v6"));
    }
    assert_eq!(map.len(), 8);
}

#[test]
fn mutable_cursor_walk_and_remove() {
    let mut map: TreeMap<i32, i32> = (1..=10).map(|i| (i, i)).collect();
    {
        let mut cursor = map.begin_mut();
        while !cursor.is_end() {
            if cursor.key().map(|k| k % 2 == 0).unwrap() {
                cursor.remove_current().unwrap();
            } else {
                *cursor.value_mut().unwrap() *= 100;
                cursor.move_next().unwrap();
            }
        }
    }
    map.assert_invariants();
    assert_eq!(map.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(),
               vec![(1, 100), (3, 300), (5, 500), (7, 700), (9, 900)]);

    let mut cursor = map.end_mut();
    cursor.move_prev().unwrap();
    let (k, v) = cursor.into_mut().unwrap();
    assert_eq!(*k, 9);
    *v = 0;
    assert_eq!(map[&9], 0);
}

#[test]
fn clones_have_their_own_identity() {
    let map = sample();
    let copy = map.clone();
    assert!(map == copy);
    assert!(map.begin() != copy.begin());

    let pos = map.find(&4).position();
    assert_eq!(copy.cursor_at(pos).err(), Some(Error::InvalidIterator(Misuse::ForeignMap)));
    assert_eq!(map.cursor_at(pos).unwrap().key(), Ok(&4));
}

#[test]
fn error_messages() {
    assert_eq!(Error::NotFound.to_string(), "key not found in map");
    assert_eq!(Error::InvalidIterator(Misuse::PastTheEnd).to_string(),
               "invalid iterator: position is past the end");
    assert_eq!(Error::InvalidIterator(Misuse::ForeignMap).to_string(),
               "invalid iterator: position belongs to another map");
}
