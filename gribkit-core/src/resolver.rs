// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `KeyResolver` is the capability a codec uses to pull named scalars and
//! arrays out of an opaque message handle, without the codec needing to know
//! anything about message/container parsing, key dictionaries, or concept
//! evaluation. An implementation lives outside this crate, in whatever
//! library owns the message format; codec crates only ever see the trait.

use crate::errors::Result;

/// Read-only lookup of named scalars and arrays from a message handle.
///
/// Implementations may fail with [`crate::errors::GribError::MissingKey`] if
/// no value is registered under `name`, or
/// [`crate::errors::GribError::WrongType`] if a value is registered but
/// isn't of the requested kind. Both propagate through the codec unchanged.
pub trait KeyResolver {
    /// Looks up a scalar integer by name.
    fn get_long(&self, name: &'static str) -> Result<i64>;

    /// Looks up a scalar double by name.
    fn get_double(&self, name: &'static str) -> Result<f64>;

    /// Looks up an integer array by name. `expected_len` is agreed
    /// out-of-band, typically from a prior `get_long` call (e.g. a group
    /// count), and the returned vector always has exactly that length.
    fn get_long_array(&self, name: &'static str, expected_len: usize) -> Result<Vec<i64>>;
}
