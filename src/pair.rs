// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// A key-value entry as stored in a `TreeMap`.
///
/// The key is fixed at construction and can only be read; the value can be
/// replaced or mutated in place.
///
/// # Examples
///
/// ```rust
/// use stable_rbtree::Pair;
///
/// let mut p = Pair::new("answer", 41);
/// *p.value_mut() += 1;
/// assert_eq!(p.key(), &"answer");
/// assert_eq!(p.into_parts(), ("answer", 42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Pair<K, V> {
        Pair {
            key: key,
            value: value,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Borrows the key immutably and the value mutably at the same time.
    #[inline]
    pub fn split_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    #[inline]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Pair<K, V> {
        Pair::new(key, value)
    }
}

impl<K, V> From<Pair<K, V>> for (K, V) {
    #[inline]
    fn from(pair: Pair<K, V>) -> (K, V) {
        pair.into_parts()
    }
}
