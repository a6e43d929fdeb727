// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Converts an integer raw value to a physical double via
//! `y = (x * 2^B + R) * 10^(-D)`, the scaling rule shared by GRIB's simple
//! and second-order packing schemes.

/// Raises `base` to the integer power `exp` by repeated
/// multiplication (positive exponents) or repeated division (negative
/// exponents), rather than `f64::powi`/`powf`. `B` and `D` may be negative
/// and the result must be reproducible bit-for-bit across platforms, which
/// a transcendental `pow` implementation is not guaranteed to give.
fn integer_power(base: f64, exp: i64) -> f64 {
    let mut result = 1.0;

    if exp >= 0 {
        for _ in 0..exp {
            result *= base;
        }
    } else {
        for _ in 0..(-exp) {
            result /= base;
        }
    }

    result
}

/// `2^exp`, exact for integer `exp` of either sign.
pub fn pow2(exp: i64) -> f64 {
    integer_power(2.0, exp)
}

/// `10^exp`, exact for integer `exp` of either sign.
pub fn pow10(exp: i64) -> f64 {
    integer_power(10.0, exp)
}

/// Applies the GRIB scaling rule to one raw integer value:
/// `(raw * 2^binary_scale + reference) * 10^(-decimal_scale)`.
///
/// The reference value is added in integer-scaled space, before the decimal
/// scale is applied, to preserve precision when `binary_scale` and
/// `decimal_scale` differ widely.
pub fn apply(raw: i64, binary_scale: i64, decimal_scale: i64, reference: f64) -> f64 {
    let binary_scaled = raw as f64 * pow2(binary_scale) + reference;
    binary_scaled * pow10(-decimal_scale)
}
