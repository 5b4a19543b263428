// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-order stepping over the node arena using parent back-links.
//!
//! These functions only read links, so they work on a plain slice of nodes
//! while the payloads are borrowed elsewhere.

use super::tree::{Dir, Node, NodeId};

/// Follows `dir` links from `id` until there are none left.
pub fn extreme(nodes: &[Node], mut id: NodeId, dir: Dir) -> NodeId {
    while let Some(next) = nodes[id.index()].child(dir) {
        id = next;
    }
    id
}

// Moving towards `dir` in key order: take the nearest node of the `dir`
// subtree if there is one, otherwise climb until we leave a subtree
// hanging on the `!dir` side of its parent.
fn step(nodes: &[Node], id: NodeId, dir: Dir) -> Option<NodeId> {
    if let Some(child) = nodes[id.index()].child(dir) {
        return Some(extreme(nodes, child, !dir));
    }

    let mut current = id;
    while let Some(parent) = nodes[current.index()].parent {
        if nodes[parent.index()].child(!dir) == Some(current) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

/// The node with the next larger key, or `None` at the maximum.
#[inline]
pub fn successor(nodes: &[Node], id: NodeId) -> Option<NodeId> {
    step(nodes, id, Dir::Right)
}

/// The node with the next smaller key, or `None` at the minimum.
#[inline]
pub fn predecessor(nodes: &[Node], id: NodeId) -> Option<NodeId> {
    step(nodes, id, Dir::Left)
}
