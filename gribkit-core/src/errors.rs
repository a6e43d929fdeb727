// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type returned by every
//! gribkit crate.

use std::error::Error as StdError;
use std::fmt;
use std::result;

/// `GribError` enumerates the ways a decode call can fail.
#[derive(Debug)]
pub enum GribError {
    /// The key resolver has no value registered under the given name.
    MissingKey(&'static str),
    /// The key resolver has a value under the given name, but it is not of
    /// the type the caller asked for.
    WrongType(&'static str),
    /// The caller-provided output buffer is smaller than the number of
    /// values the decoder is about to produce.
    ArrayTooSmall {
        /// Number of values the decode call would have written.
        needed: usize,
        /// Capacity of the buffer the caller provided.
        actual: usize,
    },
    /// An invariant that should always hold for a well-formed message was
    /// violated. This signals corrupted input, not a recoverable condition.
    InternalError(&'static str),
}

impl fmt::Display for GribError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GribError::MissingKey(name) => write!(f, "missing key: {}", name),
            GribError::WrongType(name) => write!(f, "wrong type for key: {}", name),
            GribError::ArrayTooSmall { needed, actual } => {
                write!(f, "output array too small: needed {} but got {}", needed, actual)
            }
            GribError::InternalError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for GribError {}

pub type Result<T> = result::Result<T, GribError>;

/// Convenience function to create a missing-key error.
pub fn missing_key_error<T>(name: &'static str) -> Result<T> {
    Err(GribError::MissingKey(name))
}

/// Convenience function to create a wrong-type error.
pub fn wrong_type_error<T>(name: &'static str) -> Result<T> {
    Err(GribError::WrongType(name))
}

/// Convenience function to create an array-too-small error.
pub fn array_too_small_error<T>(needed: usize, actual: usize) -> Result<T> {
    Err(GribError::ArrayTooSmall { needed, actual })
}

/// Convenience function to create an internal-error, logging it first since
/// the source treats this path as unreachable given a well-formed message.
pub fn internal_error<T>(msg: &'static str) -> Result<T> {
    log::warn!("gribkit: internal invariant violated: {}", msg);
    Err(GribError::InternalError(msg))
}
