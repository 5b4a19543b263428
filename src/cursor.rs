// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bidirectional cursors over a `TreeMap`.
//!
//! A cursor points either at an entry or at the past-the-end position that
//! follows the largest key. Stepping forward from the largest key lands on
//! past-the-end; stepping back from past-the-end lands on the largest key.
//! Every step or access the current position does not allow is reported as
//! `Error::InvalidIterator` and leaves the cursor where it was.

use std::fmt::{self, Debug};

use compare::{Compare, Natural};

use super::error::{Error, Misuse, Result};
use super::map::{MapId, TreeMap};
use super::navigate;
use super::pair::Pair;
use super::tree::{NodeId, RbTree};

/// A detached cursor position.
///
/// Unlike `Cursor` and `CursorMut`, a `Position` does not borrow its map, so
/// it can be kept across mutations and handed back to `TreeMap::erase` or
/// `TreeMap::cursor_at`. Those check that the position was taken from the same
/// map and that its entry has not been erased since.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    map: MapId,
    node: Option<(NodeId, u64)>,
}

impl Position {
    pub(crate) fn new<K, V>(map: MapId, tree: &RbTree<K, V>, node: Option<NodeId>) -> Position {
        Position {
            map: map,
            node: node.map(|id| (id, tree.node(id).stamp)),
        }
    }

    /// Whether this is the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub(crate) fn resolve<K, V>(&self, map: MapId, tree: &RbTree<K, V>) -> Result<Option<NodeId>> {
        if self.map != map {
            return Err(Error::invalid(Misuse::ForeignMap));
        }
        match self.node {
            None => Ok(None),
            Some((id, stamp)) if tree.is_live(id, stamp) => Ok(Some(id)),
            Some(_) => Err(Error::invalid(Misuse::Erased)),
        }
    }
}

fn forward<K, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> Result<Option<NodeId>> {
    match node {
        Some(id) => Ok(navigate::successor(tree.nodes(), id)),
        None => Err(Error::invalid(Misuse::PastTheEnd)),
    }
}

fn backward<K, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> Result<Option<NodeId>> {
    let prev = match node {
        Some(id) => navigate::predecessor(tree.nodes(), id),
        None => tree.last(),
    };
    match prev {
        Some(id) => Ok(Some(id)),
        None => Err(Error::invalid(Misuse::BeforeBegin)),
    }
}

fn current<K, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> Result<&Pair<K, V>> {
    match node {
        Some(id) => Ok(tree.pair(id)),
        None => Err(Error::invalid(Misuse::PastTheEnd)),
    }
}

/// A read-only cursor, obtained from `TreeMap::begin`, `end` or `find`.
///
/// # Examples
///
/// ```rust
/// use stable_rbtree::TreeMap;
///
/// let map: TreeMap<i32, &str> = vec![(1, "a"), (2, "b")].into_iter().collect();
///
/// let mut cursor = map.begin();
/// assert_eq!(cursor.get(), Ok((&1, &"a")));
/// cursor.move_next().unwrap();
/// assert_eq!(cursor.key(), Ok(&2));
/// cursor.move_next().unwrap();
/// assert!(cursor == map.end());
/// assert!(cursor.move_next().is_err());
/// ```
pub struct Cursor<'a, K: 'a, V: 'a, C: 'a + Compare<K> = Natural<K>> {
    map: &'a TreeMap<K, V, C>,
    node: Option<NodeId>,
}

impl<'a, K, V, C> Cursor<'a, K, V, C>
    where C: Compare<K>
{
    pub(crate) fn new(map: &'a TreeMap<K, V, C>, node: Option<NodeId>) -> Cursor<'a, K, V, C> {
        Cursor {
            map: map,
            node: node,
        }
    }

    /// Whether the cursor is at the past-the-end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn pair(&self) -> Result<&'a Pair<K, V>> {
        current(self.map.tree(), self.node)
    }

    pub fn get(&self) -> Result<(&'a K, &'a V)> {
        self.pair().map(|p| (p.key(), p.value()))
    }

    pub fn key(&self) -> Result<&'a K> {
        self.pair().map(Pair::key)
    }

    pub fn value(&self) -> Result<&'a V> {
        self.pair().map(Pair::value)
    }

    /// Steps to the next larger key, or to past-the-end from the largest.
    pub fn move_next(&mut self) -> Result<()> {
        self.node = forward(self.map.tree(), self.node)?;
        Ok(())
    }

    /// Steps to the next smaller key, or to the largest from past-the-end.
    pub fn move_prev(&mut self) -> Result<()> {
        self.node = backward(self.map.tree(), self.node)?;
        Ok(())
    }

    /// Steps forward and returns the cursor as it was before the step.
    pub fn fetch_next(&mut self) -> Result<Cursor<'a, K, V, C>> {
        let prior = *self;
        self.move_next()?;
        Ok(prior)
    }

    /// Steps back and returns the cursor as it was before the step.
    pub fn fetch_prev(&mut self) -> Result<Cursor<'a, K, V, C>> {
        let prior = *self;
        self.move_prev()?;
        Ok(prior)
    }

    pub fn position(&self) -> Position {
        Position::new(self.map.id(), self.map.tree(), self.node)
    }
}

impl<'a, K, V, C> Clone for Cursor<'a, K, V, C>
    where C: Compare<K>
{
    fn clone(&self) -> Cursor<'a, K, V, C> {
        *self
    }
}

impl<'a, K, V, C> Copy for Cursor<'a, K, V, C> where C: Compare<K> {}

// Cursors of two different maps never compare equal, even when the maps
// hold the same entries.
impl<'a, 'b, K, V, C> PartialEq<Cursor<'b, K, V, C>> for Cursor<'a, K, V, C>
    where C: Compare<K>
{
    fn eq(&self, other: &Cursor<'b, K, V, C>) -> bool {
        self.map.id() == other.map.id() && self.node == other.node
    }
}

impl<'a, K, V, C> Eq for Cursor<'a, K, V, C> where C: Compare<K> {}

impl<'a, K: Debug, V: Debug, C> Debug for Cursor<'a, K, V, C>
    where C: Compare<K>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Ok(entry) => f.debug_tuple("Cursor").field(&entry).finish(),
            Err(_) => f.write_str("Cursor(end)"),
        }
    }
}

/// A cursor with exclusive access to its map, obtained from
/// `TreeMap::begin_mut`, `end_mut`, `find_mut` or `insert`.
///
/// Besides navigating it can mutate the value under it and remove the entry
/// it points at.
///
/// # Examples
///
/// ```rust
/// use stable_rbtree::TreeMap;
///
/// let mut map: TreeMap<i32, i32> = (0..5).map(|i| (i, i)).collect();
///
/// let mut cursor = map.find_mut(&2);
/// *cursor.value_mut().unwrap() = 20;
/// assert_eq!(cursor.remove_current().unwrap().into_parts(), (2, 20));
/// assert_eq!(cursor.key(), Ok(&3));
///
/// assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
/// ```
pub struct CursorMut<'a, K: 'a, V: 'a, C: 'a + Compare<K> = Natural<K>> {
    map: &'a mut TreeMap<K, V, C>,
    node: Option<NodeId>,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C>
    where C: Compare<K>
{
    pub(crate) fn new(map: &'a mut TreeMap<K, V, C>, node: Option<NodeId>) -> CursorMut<'a, K, V, C> {
        CursorMut {
            map: map,
            node: node,
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// A read-only view of the current position.
    pub fn as_cursor(&self) -> Cursor<K, V, C> {
        Cursor::new(&*self.map, self.node)
    }

    pub fn pair(&self) -> Result<&Pair<K, V>> {
        current(self.map.tree(), self.node)
    }

    pub fn get(&self) -> Result<(&K, &V)> {
        self.pair().map(|p| (p.key(), p.value()))
    }

    pub fn key(&self) -> Result<&K> {
        self.pair().map(Pair::key)
    }

    pub fn value(&self) -> Result<&V> {
        self.pair().map(Pair::value)
    }

    pub fn get_mut(&mut self) -> Result<(&K, &mut V)> {
        match self.node {
            Some(id) => Ok(self.map.tree_mut().pair_mut(id).split_mut()),
            None => Err(Error::invalid(Misuse::PastTheEnd)),
        }
    }

    pub fn value_mut(&mut self) -> Result<&mut V> {
        self.get_mut().map(|(_, v)| v)
    }

    /// Gives up the cursor, keeping the entry it pointed at borrowed for the
    /// rest of the map borrow.
    pub fn into_mut(self) -> Result<(&'a K, &'a mut V)> {
        let map = self.map;
        match self.node {
            Some(id) => Ok(map.tree_mut().pair_mut(id).split_mut()),
            None => Err(Error::invalid(Misuse::PastTheEnd)),
        }
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.node = forward(self.map.tree(), self.node)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.node = backward(self.map.tree(), self.node)?;
        Ok(())
    }

    /// Steps forward and returns the position held before the step.
    pub fn fetch_next(&mut self) -> Result<Position> {
        let prior = self.position();
        self.move_next()?;
        Ok(prior)
    }

    /// Steps back and returns the position held before the step.
    pub fn fetch_prev(&mut self) -> Result<Position> {
        let prior = self.position();
        self.move_prev()?;
        Ok(prior)
    }

    pub fn position(&self) -> Position {
        Position::new(self.map.id(), self.map.tree(), self.node)
    }

    /// Removes the current entry and moves to the entry after it.
    pub fn remove_current(&mut self) -> Result<Pair<K, V>> {
        let id = match self.node {
            Some(id) => id,
            None => return Err(Error::invalid(Misuse::PastTheEnd)),
        };
        // Removal only frees `id`'s slot, so the successor stays addressable.
        let next = navigate::successor(self.map.tree().nodes(), id);
        let pair = self.map.remove_node(id);
        self.node = next;
        Ok(pair)
    }
}

impl<'a, K: Debug, V: Debug, C> Debug for CursorMut<'a, K, V, C>
    where C: Compare<K>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Ok(entry) => f.debug_tuple("CursorMut").field(&entry).finish(),
            Err(_) => f.write_str("CursorMut(end)"),
        }
    }
}
