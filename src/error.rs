// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors surfaced by `TreeMap` and its cursors.
//!
//! A missing key on `get`/`remove`/`find` and a duplicate key on `insert` are
//! ordinary outcomes and are reported through `Option`, `bool` or a
//! past-the-end cursor. The variants below are for calls whose precondition
//! the caller broke. Every failing call leaves the map untouched.

use log::debug;
use thiserror::Error;

/// Errors that can occur while accessing a map through a key or a cursor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `at`/`at_mut` was called with a key that is not in the map.
    #[error("key not found in map")]
    NotFound,

    /// A cursor or position was used in a way its current state forbids.
    #[error("invalid iterator: {0}")]
    InvalidIterator(Misuse),
}

/// The particular way a cursor or position was misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misuse {
    /// Dereferenced or advanced the past-the-end position.
    PastTheEnd,
    /// Stepped back from the first entry.
    BeforeBegin,
    /// The position belongs to a different map.
    ForeignMap,
    /// The entry the position denoted has been erased.
    Erased,
}

impl std::fmt::Display for Misuse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let what = match *self {
            Misuse::PastTheEnd => "position is past the end",
            Misuse::BeforeBegin => "cannot step before the first entry",
            Misuse::ForeignMap => "position belongs to another map",
            Misuse::Erased => "entry has been erased",
        };
        f.write_str(what)
    }
}

impl Error {
    pub(crate) fn invalid(misuse: Misuse) -> Error {
        debug!("rejecting iterator access: {}", misuse);
        Error::InvalidIterator(misuse)
    }
}

/// A `Result` alias using this crate's `Error`.
pub type Result<T> = std::result::Result<T, Error>;
