// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-smaller representations of a double in the two 32-bit floating
//! formats GRIB's lossy quantisation preprocessing rounds through: IBM
//! System/360 single precision and IEEE 754 binary32.
//!
//! Both functions return the largest value representable in the named
//! format that is `<= x`: idempotent, monotone non-decreasing, sign
//! preserving, and exact when `x` is already representable.

const IBM_FRACTION_BITS: i32 = 24;
const IBM_EXPONENT_BIAS: i32 = 64;

/// Splits `mag` (> 0) into an unbiased base-16 exponent and a fraction in
/// `[1/16, 1)`, i.e. `mag == fraction * 16^exponent`.
fn ibm_decompose(mag: f64) -> (i32, f64) {
    debug_assert!(mag > 0.0);

    let mut exponent = 0;
    let mut fraction = mag;

    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 1.0 / 16.0 {
        fraction *= 16.0;
        exponent -= 1;
    }

    (exponent, fraction)
}

/// Encodes `mag` (> 0) as a 24-bit IBM fraction, truncating towards zero
/// (`round_up = false`) or away from zero (`round_up = true`), returning the
/// biased exponent and the fraction.
fn ibm_encode(mag: f64, round_up: bool) -> (i32, u32) {
    let (mut exponent, fraction) = ibm_decompose(mag);
    let scaled = fraction * f64::from(1u32 << IBM_FRACTION_BITS);

    let mut mantissa = if round_up { scaled.ceil() } else { scaled.floor() } as u32;

    // Rounding up can overflow the 24-bit fraction; renormalize by shifting
    // one hex digit into the exponent.
    if mantissa >= (1 << IBM_FRACTION_BITS) {
        mantissa /= 16;
        exponent += 1;
    }

    (exponent + IBM_EXPONENT_BIAS, mantissa)
}

fn ibm_decode(negative: bool, biased_exponent: i32, mantissa: u32) -> f64 {
    if mantissa == 0 {
        return 0.0;
    }

    let exponent = biased_exponent - IBM_EXPONENT_BIAS;
    let value = f64::from(mantissa) / f64::from(1u32 << IBM_FRACTION_BITS) * 16f64.powi(exponent);

    if negative {
        -value
    } else {
        value
    }
}

/// Returns the largest value representable in IBM System/360 single
/// precision floating format (bias 64, base 16 exponent, 24-bit fraction,
/// sign bit) that is `<= x`.
pub fn nearest_smaller_ibm_f32(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }

    let negative = x.is_sign_negative();
    let mag = x.abs();

    // For a non-negative x, the representable values below x grow with
    // mantissa magnitude, so truncating (flooring) the mantissa gives the
    // nearest value from below. For a negative x the representable values
    // grow more negative as the mantissa's magnitude grows, so the nearest
    // value from below instead requires rounding the magnitude up.
    let (biased_exponent, mantissa) = ibm_encode(mag, negative);

    ibm_decode(negative, biased_exponent, mantissa)
}

/// Returns the previous representable `f32` below `y` (the analogue of
/// C's `nextafter(y, -inf)` restricted to binary32).
fn next_down_f32(y: f32) -> f32 {
    if y == 0.0 {
        // The largest-magnitude value below zero in either direction is the
        // smallest negative subnormal.
        return f32::from_bits(0x8000_0001);
    }

    let bits = y.to_bits();
    let bits = if y > 0.0 { bits - 1 } else { bits + 1 };
    f32::from_bits(bits)
}

/// Returns the largest value representable in IEEE 754 binary32 that is
/// `<= x`.
pub fn nearest_smaller_ieee_f32(x: f64) -> f64 {
    let rounded = x as f32;
    let rounded64 = f64::from(rounded);

    if rounded64 <= x {
        rounded64
    } else {
        f64::from(next_down_f32(rounded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {} to be within {} of {}",
            actual,
            TOLERANCE,
            expected
        );
    }

    #[test]
    fn ibm_reference_table() {
        assert_close(nearest_smaller_ibm_f32(-1.0), -1.0);
        assert_close(nearest_smaller_ibm_f32(0.0), 0.0);
        assert_close(nearest_smaller_ibm_f32(1.0), 1.0);
        assert_close(nearest_smaller_ibm_f32(1.1), 1.0999994277954);
        assert_close(nearest_smaller_ibm_f32(10.6), 10.599999427795);
        assert_close(nearest_smaller_ibm_f32(7.85), 7.8499994277954);
    }

    #[test]
    fn ieee_reference_table() {
        assert_close(nearest_smaller_ieee_f32(-1.0), -1.0);
        assert_close(nearest_smaller_ieee_f32(0.0), 0.0);
        assert_close(nearest_smaller_ieee_f32(1.0), 1.0);
        assert_close(nearest_smaller_ieee_f32(1.1), 1.0999999046325);
        assert_close(nearest_smaller_ieee_f32(10.6), 10.599999427795);
        assert_close(nearest_smaller_ieee_f32(7.85), 7.8499999046325);
    }

    #[test]
    fn both_representations_never_exceed_input() {
        for &v in &[-123.456, -1.0, -0.001, 0.0, 0.001, 1.0, 999.999, 1e6] {
            assert!(nearest_smaller_ibm_f32(v) <= v);
            assert!(nearest_smaller_ieee_f32(v) <= v);
        }
    }

    #[test]
    fn both_representations_are_idempotent() {
        for &v in &[-123.456, -1.0, -0.001, 0.0, 0.001, 1.0, 999.999, 1e6] {
            let ibm_once = nearest_smaller_ibm_f32(v);
            assert_close(nearest_smaller_ibm_f32(ibm_once), ibm_once);

            let ieee_once = nearest_smaller_ieee_f32(v);
            assert_close(nearest_smaller_ieee_f32(ieee_once), ieee_once);
        }
    }

    #[test]
    fn both_representations_preserve_sign() {
        assert!(nearest_smaller_ibm_f32(-5.0).is_sign_negative());
        assert!(nearest_smaller_ieee_f32(-5.0).is_sign_negative());
    }

    #[test]
    fn monotone_non_decreasing() {
        let xs = [-10.0, -5.5, -1.0, 0.0, 0.5, 1.0, 3.3, 10.6];
        for pair in xs.windows(2) {
            assert!(nearest_smaller_ibm_f32(pair[0]) <= nearest_smaller_ibm_f32(pair[1]));
            assert!(nearest_smaller_ieee_f32(pair[0]) <= nearest_smaller_ieee_f32(pair[1]));
        }
    }
}
