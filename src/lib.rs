// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An ordered map backed by a red-black tree that rebalances top-down.
//!
//! `TreeMap` keeps unique keys sorted by a comparator (the keys' natural
//! order by default) and offers, on top of the usual map operations,
//! bidirectional cursors: `begin`, `end`, `find`, stepping in either
//! direction, and erasure through a detached `Position`. Positions of one
//! map are never valid for another map, and a position whose entry was
//! erased is rejected instead of silently reading a reused slot.
//!
//! ```rust
//! use stable_rbtree::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for (i, word) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
//!     map.insert((*word, i));
//! }
//!
//! let mut cursor = map.find(&"bravo");
//! cursor.move_next().unwrap();
//! assert_eq!(cursor.key(), Ok(&"charlie"));
//!
//! let pos = cursor.position();
//! let (word, _) = map.erase(pos).unwrap().into_parts();
//! assert_eq!(word, "charlie");
//! assert_eq!(map.len(), 3);
//! ```
//!
//! The crate logs through the `log` facade: rejected cursor operations at
//! `debug`, bulk operations and successor relinking at `trace`.

mod cursor;
mod error;
mod map;
mod navigate;
mod pair;
mod tree;

pub use cursor::{Cursor, CursorMut, Position};
pub use error::{Error, Misuse, Result};
pub use map::{IntoIter, Iter, IterMut, Keys, TreeMap, Values, ValuesMut};
pub use pair::Pair;
