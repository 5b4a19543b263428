// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The red-black tree engine behind `TreeMap`.
//!
//! Nodes live in an index arena. The structural part of a node (color, child
//! links, parent back-link) is kept apart from its `Pair` so that the values
//! can be borrowed mutably while the links are being read.
//!
//! Both insertion and deletion rebalance top-down: the tree is repaired on
//! the way from the root to the affected leaf, and nothing is fixed up on the
//! way back.

use std::cmp::Ordering::{self, Less};
use std::ops::Not;

use compare::Compare;
use log::trace;

use super::navigate;
use super::pair::Pair;

/// Index of a node slot in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    #[inline]
    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Structural record of a node. `link` holds the owned children, `parent`
/// is only ever followed for navigation.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub color: Color,
    pub parent: Option<NodeId>,
    link: [Option<NodeId>; 2],
    // Unique within one tree for its whole life, so a stale position
    // can never match a node that later reuses the slot.
    pub stamp: u64,
}

impl Node {
    #[inline]
    pub fn child(&self, dir: Dir) -> Option<NodeId> {
        self.link[dir as usize]
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Option<NodeId>) {
        self.link[dir as usize] = child;
    }
}

#[derive(Clone)]
pub struct RbTree<K, V> {
    nodes: Vec<Node>,
    // `None` marks a vacant slot; vacant slots are listed in `free`.
    pairs: Vec<Option<Pair<K, V>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
    next_stamp: u64,
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> RbTree<K, V> {
        RbTree {
            nodes: Vec::new(),
            pairs: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            next_stamp: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Shared links together with exclusive access to the payloads.
    #[inline]
    pub fn split_mut(&mut self) -> (&[Node], &mut [Option<Pair<K, V>>]) {
        (&self.nodes, &mut self.pairs)
    }

    #[inline]
    pub fn pairs(&self) -> &[Option<Pair<K, V>>] {
        &self.pairs
    }

    pub fn pair(&self, id: NodeId) -> &Pair<K, V> {
        match self.pairs[id.0] {
            Some(ref pair) => pair,
            None => unreachable!("node {} is vacant", id.0),
        }
    }

    pub fn pair_mut(&mut self, id: NodeId) -> &mut Pair<K, V> {
        match self.pairs[id.0] {
            Some(ref mut pair) => pair,
            None => unreachable!("node {} is vacant", id.0),
        }
    }

    #[inline]
    pub fn key(&self, id: NodeId) -> &K {
        self.pair(id).key()
    }

    /// Moves a payload out of its slot without unlinking the node. Only
    /// meant for consuming iteration, where the tree is dropped afterwards.
    pub fn take_pair(&mut self, id: NodeId) -> Option<Pair<K, V>> {
        self.pairs[id.0].take()
    }

    /// Whether `id` currently holds the node that was stamped `stamp`.
    pub fn is_live(&self, id: NodeId, stamp: u64) -> bool {
        id.0 < self.pairs.len() && self.pairs[id.0].is_some() && self.nodes[id.0].stamp == stamp
    }

    /// The node with the smallest key.
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| navigate::extreme(&self.nodes, root, Dir::Left))
    }

    /// The node with the largest key.
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| navigate::extreme(&self.nodes, root, Dir::Right))
    }

    #[inline]
    fn child(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.nodes[id.0].child(dir)
    }

    #[inline]
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| self.nodes[id.0].color == Color::Red)
    }

    #[inline]
    fn paint(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Which child of its parent `id` is. `id` must not be the root.
    fn side(&self, id: NodeId) -> Dir {
        match self.parent(id) {
            Some(p) if self.child(p, Dir::Left) == Some(id) => Dir::Left,
            Some(_) => Dir::Right,
            None => unreachable!("the root is nobody's child"),
        }
    }

    /// Points whatever referred to `old` (its parent's link, or the root) at
    /// `new`. Parent back-links of `new` are left to the caller.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let dir = if self.child(p, Dir::Left) == Some(old) {
                    Dir::Left
                } else {
                    Dir::Right
                };
                self.node_mut(p).set_child(dir, new);
            }
        }
    }

    fn alloc(&mut self, pair: Pair<K, V>, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            color: Color::Red,
            parent: parent,
            link: [None, None],
            stamp: self.next_stamp,
        };
        self.next_stamp += 1;

        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                self.pairs[id.0] = Some(pair);
                id
            }
            None => {
                self.nodes.push(node);
                self.pairs.push(Some(pair));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Pair<K, V> {
        self.free.push(id);
        match self.pairs[id.0].take() {
            Some(pair) => pair,
            None => unreachable!("node {} released twice", id.0),
        }
    }

    /// Drops every entry at once; no node is visited individually.
    pub fn clear(&mut self) {
        trace!("clearing {} entries", self.len);
        self.nodes.clear();
        self.pairs.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    // The search closure receives the current key and returns
    // `search_key.cmp(current_key)`, as with `TreeMap::find_with`.
    pub fn find_with<F>(&self, mut f: F) -> Option<NodeId>
        where F: FnMut(&K) -> Ordering
    {
        let mut current = self.root;
        while let Some(id) = current {
            current = match f(self.key(id)) {
                Ordering::Less => self.child(id, Dir::Left),
                Ordering::Greater => self.child(id, Dir::Right),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Single rotation: `root` sinks towards `dir` and its child on the other
    /// side takes its place. The risen node turns black, `root` turns red.
    ///
    /// With `dir == Right` this is the LL rotation, with `dir == Left` the RR
    /// rotation.
    fn rotate(&mut self, root: NodeId, dir: Dir) -> NodeId {
        let save = match self.child(root, !dir) {
            Some(save) => save,
            None => unreachable!("rotation needs a child on the rising side"),
        };
        let up = self.parent(root);
        let inner = self.child(save, dir);

        self.node_mut(root).set_child(!dir, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(root);
        }
        self.node_mut(save).set_child(dir, Some(root));
        self.node_mut(root).parent = Some(save);
        self.node_mut(save).parent = up;
        self.replace_child(up, root, Some(save));

        self.paint(root, Color::Red);
        self.paint(save, Color::Black);
        save
    }

    /// Double rotation (LR for `dir == Right`, RL for `dir == Left`): the
    /// inner grandchild of `root` on the `!dir` side rises two levels.
    fn rotate_double(&mut self, root: NodeId, dir: Dir) -> NodeId {
        match self.child(root, !dir) {
            Some(child) => {
                self.rotate(child, !dir);
            }
            None => unreachable!("double rotation needs a child on the rising side"),
        }
        self.rotate(root, dir)
    }

    /// Resolves a red node `q` sitting under a red parent by rotating at the
    /// grandparent. A red root parent is simply repainted.
    fn fix_red_pair(&mut self, q: NodeId) {
        let p = match self.parent(q) {
            Some(p) if self.is_red(Some(p)) && self.is_red(Some(q)) => p,
            _ => return,
        };
        let g = match self.parent(p) {
            Some(g) => g,
            None => {
                self.paint(p, Color::Black);
                return;
            }
        };

        let last = self.side(p);
        if self.child(p, last) == Some(q) {
            self.rotate(g, !last);
        } else {
            self.rotate_double(g, !last);
        }
    }

    fn paint_root_black(&mut self) {
        if let Some(root) = self.root {
            self.paint(root, Color::Black);
        }
    }

    /// Inserts `pair` unless its key is present. Returns the node holding the
    /// key and whether a new node was created; a duplicate leaves the tree
    /// untouched and drops `pair`.
    pub fn insert<C>(&mut self, pair: Pair<K, V>, cmp: &C) -> (NodeId, bool)
        where C: Compare<K>
    {
        if let Some(id) = self.find_with(|k| cmp.compare(pair.key(), k)) {
            return (id, false);
        }

        let mut parent = None;
        let mut dir = Dir::Left;
        let mut current = self.root;

        while let Some(q) = current {
            // A black node with two red children can absorb one more red
            // below it only after pushing its blackness down.
            if self.is_red(self.child(q, Dir::Left)) && self.is_red(self.child(q, Dir::Right)) {
                self.paint(q, Color::Red);
                for &side in &[Dir::Left, Dir::Right] {
                    if let Some(c) = self.child(q, side) {
                        self.paint(c, Color::Black);
                    }
                }
                self.fix_red_pair(q);
            }

            dir = match cmp.compare(pair.key(), self.key(q)) {
                Less => Dir::Left,
                _ => Dir::Right,
            };
            parent = Some(q);
            current = self.child(q, dir);
        }

        let id = self.alloc(pair, parent);
        match parent {
            Some(p) => self.node_mut(p).set_child(dir, Some(id)),
            None => self.root = Some(id),
        }
        self.fix_red_pair(id);
        self.paint_root_black();
        self.len += 1;
        (id, true)
    }

    /// Unlinks `target`, which must be a live node, and returns its pair.
    ///
    /// The descent keeps the current node red (pushing red down from the
    /// parent or borrowing it from the sibling's side) so that the node
    /// finally unlinked is red, or is the root, and no black-height is lost.
    /// A target with two children is replaced by its in-order successor
    /// node, which is the one physically unlinked from the bottom.
    pub fn remove<C>(&mut self, target: NodeId, cmp: &C) -> Pair<K, V>
        where C: Compare<K>
    {
        let mut q = match self.root {
            Some(root) => root,
            None => unreachable!("remove from an empty tree"),
        };

        let dir = loop {
            let dir = if q == target {
                Dir::Right
            } else {
                match cmp.compare(self.key(target), self.key(q)) {
                    Less => Dir::Left,
                    _ => Dir::Right,
                }
            };

            if !self.is_red(Some(q)) && !self.is_red(self.child(q, dir)) {
                if self.is_red(self.child(q, !dir)) {
                    // The red child on the far side rises above `q`, which
                    // turns red.
                    self.rotate(q, dir);
                } else if let Some(p) = self.parent(q) {
                    let last = self.side(q);
                    if let Some(s) = self.child(p, !last) {
                        if !self.is_red(self.child(s, !last)) && !self.is_red(self.child(s, last)) {
                            self.paint(p, Color::Black);
                            self.paint(s, Color::Red);
                            self.paint(q, Color::Red);
                        } else {
                            let top = if self.is_red(self.child(s, last)) {
                                self.rotate_double(p, last)
                            } else {
                                self.rotate(p, last)
                            };
                            self.paint(q, Color::Red);
                            self.paint(top, Color::Red);
                            for &side in &[Dir::Left, Dir::Right] {
                                if let Some(c) = self.child(top, side) {
                                    self.paint(c, Color::Black);
                                }
                            }
                        }
                    }
                }
            }

            match self.child(q, dir) {
                Some(next) => q = next,
                None => break dir,
            }
        };

        // `q` has nothing towards `dir`; its other child, if any, moves up.
        let child = self.child(q, !dir);
        let up = self.parent(q);
        if let Some(child) = child {
            self.node_mut(child).parent = up;
        }
        self.replace_child(up, q, child);

        if q != target {
            trace!("relinking successor {:?} in place of {:?}", q, target);
            let old = *self.node(target);
            {
                let node = self.node_mut(q);
                node.color = old.color;
                node.parent = old.parent;
                node.link = old.link;
            }
            for c in old.link.iter().flatten() {
                self.node_mut(*c).parent = Some(q);
            }
            self.replace_child(old.parent, target, Some(q));
        }

        self.paint_root_black();
        self.len -= 1;
        self.release(target)
    }

    /// Height of the tree in nodes.
    pub fn height(&self) -> usize {
        fn walk<K, V>(tree: &RbTree<K, V>, id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => {
                    1 + ::std::cmp::max(walk(tree, tree.child(id, Dir::Left)),
                                        walk(tree, tree.child(id, Dir::Right)))
                }
            }
        }
        walk(self, self.root)
    }

    /// Checks every structural invariant and returns the black-height, or a
    /// description of the first violation found.
    pub fn validate<C>(&self, cmp: &C) -> Result<usize, String>
        where C: Compare<K>
    {
        fn subtree<K, V>(tree: &RbTree<K, V>,
                         id: Option<NodeId>,
                         parent: Option<NodeId>,
                         count: &mut usize)
                         -> Result<usize, String> {
            let id = match id {
                None => return Ok(1),
                Some(id) => id,
            };
            if tree.pairs[id.0].is_none() {
                return Err(format!("node {} is linked but vacant", id.0));
            }
            if tree.parent(id) != parent {
                return Err(format!("node {} has a stale parent link", id.0));
            }
            *count += 1;

            let red = tree.is_red(Some(id));
            if red && (tree.is_red(tree.child(id, Dir::Left)) || tree.is_red(tree.child(id, Dir::Right))) {
                return Err(format!("red node {} has a red child", id.0));
            }

            let left = subtree(tree, tree.child(id, Dir::Left), Some(id), count)?;
            let right = subtree(tree, tree.child(id, Dir::Right), Some(id), count)?;
            if left != right {
                return Err(format!("black-height differs under node {}: {} vs {}", id.0, left, right));
            }
            Ok(if red { left } else { left + 1 })
        }

        if self.is_red(self.root) {
            return Err("root is red".to_string());
        }

        let mut count = 0;
        let black_height = subtree(self, self.root, None, &mut count)?;
        if count != self.len {
            return Err(format!("{} nodes reachable but length is {}", count, self.len));
        }

        let mut current = self.first();
        while let Some(id) = current {
            let next = navigate::successor(&self.nodes, id);
            if let Some(next) = next {
                if cmp.compare(self.key(id), self.key(next)) != Less {
                    return Err(format!("keys of nodes {} and {} are out of order", id.0, next.0));
                }
            }
            current = next;
        }

        Ok(black_height)
    }
}
