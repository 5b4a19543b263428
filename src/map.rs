// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::{self, FusedIterator};
use std::marker::PhantomData;
use std::ops;
use std::sync::atomic::{self, AtomicU64};

use compare::{Compare, Natural, natural};
use log::trace;

use super::cursor::{Cursor, CursorMut, Position};
use super::error::{Error, Misuse, Result};
use super::navigate;
use super::pair::Pair;
use super::tree::{Node, NodeId, RbTree};

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one map instance, used to tell positions of different maps
/// apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    fn fresh() -> MapId {
        MapId(NEXT_MAP_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// An ordered map implemented as a red-black tree.
///
/// Entries are kept sorted by key according to the map's comparator. Lookup,
/// insertion and removal take O(log n) in the worst case; both rebalance on
/// the way down from the root, in a single pass.
///
/// Besides the usual iterators, the map hands out bidirectional cursors
/// (`begin`, `end`, `find`, and their `_mut` forms) and detached `Position`s
/// that can be used to erase an entry later.
///
/// # Examples
///
/// ```rust
/// use stable_rbtree::TreeMap;
///
/// let mut map = TreeMap::new();
///
/// map.insert((2, "bar"));
/// map.insert((1, "foo"));
/// map.insert((3, "quux"));
///
/// // In ascending order by keys
/// for (key, value) in map.iter() {
///     println!("{}: {}", key, value);
/// }
///
/// // Inserting an existing key changes nothing
/// let (_, inserted) = map.insert((1, "other"));
/// assert!(!inserted);
/// assert_eq!(map[&1], "foo");
///
/// map.remove(&1);
/// assert_eq!(map.len(), 2);
///
/// for key in 0..4 {
///     match map.get(&key) {
///         Some(value) => println!("{} has a value: {}", key, value),
///         None => println!("{} not in map", key),
///     }
/// }
///
/// map.clear();
/// assert!(map.is_empty());
/// ```
///
/// A `TreeMap` can also be used with a custom ordering:
///
/// ```rust
/// use stable_rbtree::TreeMap;
///
/// struct Troll<'a> {
///     name: &'a str,
///     level: u32,
/// }
///
/// let mut trolls = TreeMap::with_comparator(|l: &Troll, r: &Troll| l.level.cmp(&r.level));
///
/// trolls.insert((Troll { name: "Orgarr", level: 2 }, vec!["King Karl"]));
/// trolls.insert((Troll { name: "Blargarr", level: 3 }, vec!["Odd"]));
/// trolls.insert((Troll { name: "Wartilda", level: 1 }, vec![]));
///
/// // Print the trolls, ordered by level with smallest level first
/// for (troll, heroes) in trolls.iter() {
///     println!("level {}: '{}' has slain {} heroes",
///              troll.level, troll.name, heroes.len());
/// }
/// assert_eq!(trolls.first().map(|(t, _)| t.name), Some("Wartilda"));
/// ```
pub struct TreeMap<K, V, C: Compare<K> = Natural<K>> {
    tree: RbTree<K, V>,
    cmp: C,
    id: MapId,
}

// Copies get an identity of their own: a position taken from one map is
// never valid for another, even right after a clone.
impl<K: Clone, V: Clone, C> Clone for TreeMap<K, V, C>
    where C: Compare<K> + Clone
{
    fn clone(&self) -> TreeMap<K, V, C> {
        trace!("cloning map of {} entries", self.len());
        TreeMap {
            tree: self.tree.clone(),
            cmp: self.cmp.clone(),
            id: MapId::fresh(),
        }
    }

    fn clone_from(&mut self, source: &TreeMap<K, V, C>) {
        trace!("replacing {} entries with a copy of {}", self.len(), source.len());
        self.tree.clone_from(&source.tree);
        self.cmp = source.cmp.clone();
        self.id = MapId::fresh();
    }
}

// FIXME: decide what equality means for maps ordered by a custom comparator
impl<K: PartialEq + Ord, V: PartialEq> PartialEq for TreeMap<K, V> {
    #[inline]
    fn eq(&self, other: &TreeMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<K: Eq + Ord, V: Eq> Eq for TreeMap<K, V> {}

impl<K: Ord, V: PartialOrd> PartialOrd for TreeMap<K, V> {
    #[inline]
    fn partial_cmp(&self, other: &TreeMap<K, V>) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<K: Ord, V: Ord> Ord for TreeMap<K, V> {
    #[inline]
    fn cmp(&self, other: &TreeMap<K, V>) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<K: Debug, V: Debug, C> Debug for TreeMap<K, V, C>
    where C: Compare<K>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;

        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {:?}", *k, *v)?;
        }

        write!(f, "}}")
    }
}

impl<K, V, C> Default for TreeMap<K, V, C>
    where C: Compare<K> + Default
{
    #[inline]
    fn default() -> TreeMap<K, V, C> {
        TreeMap::with_comparator(Default::default())
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for TreeMap<K, V, C>
    where C: Compare<K> + Compare<Q, K>
{
    type Output = V;
    #[inline]
    fn index(&self, i: &'a Q) -> &V {
        self.get(i).expect("no entry found for key")
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::IndexMut<&'a Q> for TreeMap<K, V, C>
    where C: Compare<K> + Compare<Q, K>
{
    #[inline]
    fn index_mut(&mut self, i: &'a Q) -> &mut V {
        self.get_mut(i).expect("no entry found for key")
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates an empty `TreeMap` ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map: TreeMap<&str, i32> = TreeMap::new();
    /// ```
    pub fn new() -> TreeMap<K, V> {
        TreeMap::with_comparator(natural())
    }
}

impl<K, V, C> TreeMap<K, V, C>
    where C: Compare<K>
{
    /// Creates an empty `TreeMap` ordered according to the given comparator.
    ///
    /// The comparator must order keys the same way for the whole life of the
    /// map.
    pub fn with_comparator(cmp: C) -> TreeMap<K, V, C> {
        TreeMap {
            tree: RbTree::new(),
            cmp: cmp,
            id: MapId::fresh(),
        }
    }

    /// Returns the comparator according to which the `TreeMap` is ordered.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    #[inline]
    pub(crate) fn tree(&self) -> &RbTree<K, V> {
        &self.tree
    }

    #[inline]
    pub(crate) fn tree_mut(&mut self) -> &mut RbTree<K, V> {
        &mut self.tree
    }

    #[inline]
    pub(crate) fn id(&self) -> MapId {
        self.id
    }

    pub(crate) fn remove_node(&mut self, id: NodeId) -> Pair<K, V> {
        self.tree.remove(id, &self.cmp)
    }

    fn find_node<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
        where C: Compare<Q, K>
    {
        let cmp = &self.cmp;
        self.tree.find_with(|k| cmp.compare(key, k))
    }

    /// Gets a lazy iterator over the keys in the map, in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map = TreeMap::new();
    /// map.insert(("a", 1));
    /// map.insert(("c", 3));
    /// map.insert(("b", 2));
    ///
    /// let keys: Vec<_> = map.keys().cloned().collect();
    /// assert_eq!(keys, vec!["a", "b", "c"]);
    /// ```
    pub fn keys<'a>(&'a self) -> Keys<'a, K, V> {
        fn first<A, B>((a, _): (A, B)) -> A {
            a
        }
        let first: fn((&'a K, &'a V)) -> &'a K = first; // coerce to fn pointer

        Keys(self.iter().map(first))
    }

    /// Gets a lazy iterator over the values in the map, in ascending order
    /// with respect to the corresponding keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map = TreeMap::new();
    /// map.insert(("a", 1));
    /// map.insert(("c", 3));
    /// map.insert(("b", 2));
    ///
    /// let values: Vec<_> = map.values().cloned().collect();
    /// assert_eq!(values, vec![1, 2, 3]);
    /// ```
    pub fn values<'a>(&'a self) -> Values<'a, K, V> {
        fn second<A, B>((_, b): (A, B)) -> B {
            b
        }
        let second: fn((&'a K, &'a V)) -> &'a V = second; // coerce to fn pointer

        Values(self.iter().map(second))
    }

    /// Gets a lazy iterator over mutable references to the values, in
    /// ascending order of their keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map = TreeMap::new();
    /// map.insert(("a", 1));
    /// map.insert(("c", 3));
    /// map.insert(("b", 2));
    ///
    /// for x in map.values_mut() {
    ///     *x += 1;
    /// }
    ///
    /// let values: Vec<_> = map.values().cloned().collect();
    /// assert_eq!(values, vec![2, 3, 4]);
    /// ```
    pub fn values_mut<'a>(&'a mut self) -> ValuesMut<'a, K, V> {
        fn second<A, B>((_, b): (A, B)) -> B {
            b
        }
        let second: fn((&'a K, &'a mut V)) -> &'a mut V = second; // coerce to fn pointer

        ValuesMut(self.iter_mut().map(second))
    }

    /// Gets a lazy iterator over the key-value pairs in the map, in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map = TreeMap::new();
    /// map.insert(("a", 1));
    /// map.insert(("c", 3));
    /// map.insert(("b", 2));
    ///
    /// // Print contents in ascending order
    /// for (key, value) in map.iter() {
    ///     println!("{}: {}", key, value);
    /// }
    /// assert_eq!(map.iter().next_back(), Some((&"c", &3)));
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            nodes: self.tree.nodes(),
            pairs: self.tree.pairs(),
            front: self.tree.first(),
            back: self.tree.last(),
            remaining: self.tree.len(),
        }
    }

    /// Gets a lazy iterator over the key-value pairs in the map, with the
    /// values being mutable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    /// let mut map = TreeMap::new();
    /// map.insert(("a", 1));
    /// map.insert(("c", 3));
    /// map.insert(("b", 2));
    ///
    /// // Add 10 until we find "b"
    /// for (key, value) in map.iter_mut() {
    ///     *value += 10;
    ///     if key == &"b" { break }
    /// }
    ///
    /// assert_eq!(map.get(&"a"), Some(&11));
    /// assert_eq!(map.get(&"b"), Some(&12));
    /// assert_eq!(map.get(&"c"), Some(&3));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        let front = self.tree.first();
        let back = self.tree.last();
        let remaining = self.tree.len();
        let (nodes, pairs) = self.tree.split_mut();
        IterMut {
            nodes: nodes,
            pairs: pairs.as_mut_ptr(),
            front: front,
            back: back,
            remaining: remaining,
            marker: PhantomData,
        }
    }

    /// Return the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert((1, "a"));
    /// assert_eq!(a.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Return true if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values. Every cursor position taken
    /// before is invalidated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// a.insert((1, "a"));
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert((1, "a"));
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[inline]
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
        where C: Compare<Q, K>
    {
        self.find_node(key).map(|id| self.tree.pair(id).value())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
        where C: Compare<Q, K>
    {
        match self.find_node(key) {
            Some(id) => Some(self.tree.pair_mut(id).value_mut()),
            None => None,
        }
    }

    /// Returns true if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
        where C: Compare<Q, K>
    {
        self.find_node(key).is_some()
    }

    /// Returns the number of entries with the given key, which is 0 or 1.
    #[inline]
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
        where C: Compare<Q, K>
    {
        self.contains_key(key) as usize
    }

    /// Returns a reference to the value for `key`, failing with
    /// `Error::NotFound` when there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::{Error, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    /// map.insert((1, "a"));
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::NotFound));
    /// ```
    pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V>
        where C: Compare<Q, K>
    {
        self.get(key).ok_or(Error::NotFound)
    }

    /// Mutable form of `at`.
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V>
        where C: Compare<Q, K>
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Returns the smallest key and its value.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|id| {
            let pair = self.tree.pair(id);
            (pair.key(), pair.value())
        })
    }

    /// Returns the largest key and its value.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|id| {
            let pair = self.tree.pair(id);
            (pair.key(), pair.value())
        })
    }

    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns a cursor at the entry holding the key, and whether the pair
    /// was inserted. An existing entry is left untouched and the offered pair
    /// is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// let (cursor, inserted) = map.insert((37, "a"));
    /// assert!(inserted);
    /// assert_eq!(cursor.key(), Ok(&37));
    ///
    /// let (cursor, inserted) = map.insert((37, "b"));
    /// assert!(!inserted);
    /// assert_eq!(cursor.value(), Ok(&"a"));
    /// ```
    pub fn insert<P>(&mut self, pair: P) -> (CursorMut<K, V, C>, bool)
        where P: Into<Pair<K, V>>
    {
        let (id, inserted) = self.tree.insert(pair.into(), &self.cmp);
        (CursorMut::new(self, Some(id)), inserted)
    }

    /// If a value for `key` does not exist, create one by callling `default`.
    /// Returns a mut reference to the new or existing value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut count: TreeMap<&str, usize> = TreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in vec!["a","b","a","c","a","b"] {
    ///     *count.get_or_insert(x, || 0) += 1;
    /// }
    /// assert_eq!(count[&"a"], 3);
    /// ```
    pub fn get_or_insert<F>(&mut self, key: K, default: F) -> &mut V
        where F: FnOnce() -> V
    {
        let id = match self.find_node(&key) {
            Some(id) => id,
            None => self.tree.insert(Pair::new(key, default()), &self.cmp).0,
        };
        self.tree.pair_mut(id).value_mut()
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key
    /// is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut map: TreeMap<&str, Vec<i32>> = TreeMap::new();
    /// map.get_or_default("odd").push(1);
    /// map.get_or_default("odd").push(3);
    /// assert_eq!(map[&"odd"], vec![1, 3]);
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
        where V: Default
    {
        self.get_or_insert(key, V::default)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert((1, "a"));
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
        where C: Compare<Q, K>
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
        where C: Compare<Q, K>
    {
        let id = self.find_node(key)?;
        Some(self.remove_node(id).into_parts())
    }

    /// Removes the entry at `pos` and returns it.
    ///
    /// Fails with `Error::InvalidIterator` if `pos` is the past-the-end
    /// position, was taken from another map, or denotes an entry that has
    /// already been erased. The map is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut map: TreeMap<i32, char> = vec![(1, 'a'), (2, 'b')].into_iter().collect();
    /// let pos = map.find(&1).position();
    /// assert_eq!(map.erase(pos).unwrap().into_parts(), (1, 'a'));
    /// assert!(map.erase(pos).is_err());
    ///
    /// let end = map.end().position();
    /// assert!(map.erase(end).is_err());
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<Pair<K, V>> {
        match pos.resolve(self.id, &self.tree)? {
            Some(id) => Ok(self.remove_node(id)),
            None => Err(Error::invalid(Misuse::PastTheEnd)),
        }
    }

    /// Cursor at the smallest key, or at past-the-end for an empty map.
    pub fn begin(&self) -> Cursor<K, V, C> {
        Cursor::new(self, self.tree.first())
    }

    /// Cursor at the past-the-end position.
    pub fn end(&self) -> Cursor<K, V, C> {
        Cursor::new(self, None)
    }

    pub fn begin_mut(&mut self) -> CursorMut<K, V, C> {
        let first = self.tree.first();
        CursorMut::new(self, first)
    }

    pub fn end_mut(&mut self) -> CursorMut<K, V, C> {
        CursorMut::new(self, None)
    }

    /// Cursor at `key`, or at past-the-end if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = (0..10).map(|i| (i * 2, i)).collect();
    /// let mut cursor = map.find(&8);
    /// cursor.move_next().unwrap();
    /// assert_eq!(cursor.get(), Ok((&10, &5)));
    /// assert!(map.find(&7) == map.end());
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor<K, V, C>
        where C: Compare<Q, K>
    {
        Cursor::new(self, self.find_node(key))
    }

    pub fn find_mut<Q: ?Sized>(&mut self, key: &Q) -> CursorMut<K, V, C>
        where C: Compare<Q, K>
    {
        let node = self.find_node(key);
        CursorMut::new(self, node)
    }

    /// Turns a position taken earlier back into a cursor.
    pub fn cursor_at(&self, pos: Position) -> Result<Cursor<K, V, C>> {
        let node = pos.resolve(self.id, &self.tree)?;
        Ok(Cursor::new(self, node))
    }

    pub fn cursor_mut_at(&mut self, pos: Position) -> Result<CursorMut<K, V, C>> {
        let node = pos.resolve(self.id, &self.tree)?;
        Ok(CursorMut::new(self, node))
    }

    /// Returns the value for which `f(key)` returns `Equal`. `f` is invoked
    /// with current key and guides tree navigation. That means `f` should
    /// be aware of natural ordering of the tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stable_rbtree::TreeMap;
    ///
    /// let mut headers = TreeMap::new();
    /// headers.insert(("Content-Type", "application/xml"));
    /// headers.insert(("User-Agent", "Curl-Rust/0.1"));
    ///
    /// let ua = headers.find_with(|&k| "User-Agent".cmp(k));
    /// assert_eq!(ua, Some(&"Curl-Rust/0.1"));
    /// ```
    #[inline]
    pub fn find_with<F>(&self, f: F) -> Option<&V>
        where F: FnMut(&K) -> Ordering
    {
        self.tree.find_with(f).map(|id| self.tree.pair(id).value())
    }

    /// Mutable form of `find_with`.
    #[inline]
    pub fn find_with_mut<F>(&mut self, f: F) -> Option<&mut V>
        where F: FnMut(&K) -> Ordering
    {
        match self.tree.find_with(f) {
            Some(id) => Some(self.tree.pair_mut(id).value_mut()),
            None => None,
        }
    }

    /// Number of nodes on the longest path from the root.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Panics with a description if any red-black or ordering invariant is
    /// broken. Meant for tests and debugging.
    pub fn assert_invariants(&self) {
        if let Err(msg) = self.tree.validate(&self.cmp) {
            panic!("TreeMap invariant violated: {}", msg);
        }
    }
}

/// Lazy double-ended iterator over a map, in ascending key order.
pub struct Iter<'a, K: 'a, V: 'a> {
    nodes: &'a [Node],
    pairs: &'a [Option<Pair<K, V>>],
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> {
        Iter {
            nodes: self.nodes,
            pairs: self.pairs,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn entry(&self, id: NodeId) -> Option<(&'a K, &'a V)> {
        let pairs: &'a [Option<Pair<K, V>>] = self.pairs;
        pairs[id.index()].as_ref().map(|p| (p.key(), p.value()))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = navigate::successor(self.nodes, id);
        self.remaining -= 1;
        self.entry(id)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = navigate::predecessor(self.nodes, id);
        self.remaining -= 1;
        self.entry(id)
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// Lazy double-ended iterator over a map that allows for the mutation of
/// the values.
pub struct IterMut<'a, K: 'a, V: 'a> {
    nodes: &'a [Node],
    // Points at the payload slots of a tree borrowed mutably for 'a. Only
    // the slots of nodes handed out are ever dereferenced, each at most once.
    pairs: *mut Option<Pair<K, V>>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
    marker: PhantomData<&'a mut Pair<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn entry(&mut self, id: NodeId) -> Option<(&'a K, &'a mut V)> {
        // SAFETY: `id` is a live node of the borrowed tree, so the offset is
        // in bounds, and the front and back ends never yield the same node,
        // so no two returned references alias.
        let slot = unsafe { &mut *self.pairs.add(id.index()) };
        slot.as_mut().map(Pair::split_mut)
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = navigate::successor(self.nodes, id);
        self.remaining -= 1;
        self.entry(id)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = navigate::predecessor(self.nodes, id);
        self.remaining -= 1;
        self.entry(id)
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}
impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// Lazy double-ended iterator that consumes the map.
pub struct IntoIter<K, V> {
    tree: RbTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = navigate::successor(self.tree.nodes(), id);
        self.remaining -= 1;
        self.tree.take_pair(id).map(Pair::into_parts)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = navigate::predecessor(self.tree.nodes(), id);
        self.remaining -= 1;
        self.tree.take_pair(id).map(Pair::into_parts)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// TreeMap keys iterator.
pub struct Keys<'a, K: 'a, V: 'a>(iter::Map<Iter<'a, K, V>, fn((&'a K, &'a V)) -> &'a K>);

/// TreeMap values iterator.
pub struct Values<'a, K: 'a, V: 'a>(iter::Map<Iter<'a, K, V>, fn((&'a K, &'a V)) -> &'a V>);

/// TreeMap mutable values iterator.
pub struct ValuesMut<'a, K: 'a, V: 'a>(iter::Map<IterMut<'a, K, V>,
                                                 fn((&'a K, &'a mut V)) -> &'a mut V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.0.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a K> {
        self.0.next_back()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.0.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a V> {
        self.0.next_back()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.0.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut V> {
        self.0.next_back()
    }
}

impl<K, V, C> iter::FromIterator<(K, V)> for TreeMap<K, V, C>
    where C: Compare<K> + Default
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> TreeMap<K, V, C> {
        let mut map: TreeMap<K, V, C> = Default::default();
        map.extend(iter);
        map
    }
}

// Like `insert`, keys already present keep their first value.
impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
    where C: Compare<K>
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.tree.insert(Pair::new(k, v), &self.cmp);
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for TreeMap<K, V, C>
    where C: Compare<K>
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        for elt in self.iter() {
            elt.hash(state);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C>
    where C: Compare<K>
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut TreeMap<K, V, C>
    where C: Compare<K>
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

/// Consumes the map, yielding its entries in ascending order.
///
/// # Examples
///
/// ```rust
/// use stable_rbtree::TreeMap;
/// let mut map = TreeMap::new();
/// map.insert(("a", 1));
/// map.insert(("c", 3));
/// map.insert(("b", 2));
///
/// let vec: Vec<(&str, i32)> = map.into_iter().collect();
/// assert_eq!(vec, vec![("a", 1), ("b", 2), ("c", 3)]);
/// ```
impl<K, V, C> IntoIterator for TreeMap<K, V, C>
    where C: Compare<K>
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        let TreeMap { tree, .. } = self;
        IntoIter {
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len(),
            tree: tree,
        }
    }
}

#[cfg(feature="ordered_iter")]
impl<'a, K, V> ::ordered_iter::OrderedMapIterator for Iter<'a, K, V> {
    type Key = &'a K;
    type Val = &'a V;
}
