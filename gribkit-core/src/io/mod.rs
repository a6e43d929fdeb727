// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bit-level reading over an in-memory buffer.

pub mod bit;

pub use bit::BitCursor;
