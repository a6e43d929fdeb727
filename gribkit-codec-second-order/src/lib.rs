// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Decoder for GRIB Edition-1 "second-order" (complex) packed data: a
//! bit-level layout combining a secondary group bitmap, per-group
//! first-order values, and per-group variable-width residuals, re-scaled
//! through integer binary and decimal exponents into physical units.
//!
//! ```text
//! [ secondaryBitmap : N_V bits                                  ]
//! [ pad to next byte boundary                                   ]
//! [ firstOrderValues : N_G x W_F bits                            ]
//! [ pad to next byte boundary                                   ]
//! [ residuals       : sum_g (groupLength_g x groupWidths[g]) bits ]
//! ```
//!
//! The decoder never touches disk, the surrounding message container, or
//! concept/template evaluation: it only reads named scalars and arrays
//! through a caller-supplied [`KeyResolver`], and a byte buffer plus offset
//! the caller has already located.

use gribkit_core::errors::{array_too_small_error, internal_error};
use gribkit_core::io::BitCursor;
use gribkit_core::scaling;
use gribkit_core::{KeyResolver, Result};

/// Key resolver names this decoder looks up, exactly as documented by the
/// enclosing GRIB accessor this codec is designed to sit behind.
mod keys {
    pub const NUMBER_OF_GROUPS: &str = "numberOfGroups";
    pub const WIDTH_OF_FIRST_ORDER_VALUES: &str = "widthOfFirstOrderValues";
    pub const NUMBER_OF_SECOND_ORDER_PACKED_VALUES: &str = "numberOfSecondOrderPackedValues";
    pub const BINARY_SCALE_FACTOR: &str = "binary_scale_factor";
    pub const DECIMAL_SCALE_FACTOR: &str = "decimal_scale_factor";
    pub const REFERENCE_VALUE: &str = "reference_value";
    pub const GROUP_WIDTHS: &str = "groupWidths";
}

/// Options accepted by [`SecondOrderDecoder`]. Empty today; kept
/// non-exhaustive so new options don't break callers, mirroring the
/// decoder-options structs used throughout the corpus this crate is
/// styled on.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy)]
pub struct SecondOrderDecoderOptions {}

/// The scalar parameters of one second-order packed block, resolved by
/// name through a [`KeyResolver`].
struct SecondOrderParams {
    number_of_groups: usize,
    width_of_first_order_values: u32,
    number_of_values: usize,
    binary_scale_factor: i64,
    decimal_scale_factor: i64,
    reference_value: f64,
}

impl SecondOrderParams {
    fn resolve(resolver: &dyn KeyResolver) -> Result<Self> {
        let number_of_groups = resolver.get_long(keys::NUMBER_OF_GROUPS)?;
        let width_of_first_order_values =
            resolver.get_long(keys::WIDTH_OF_FIRST_ORDER_VALUES)?;
        let number_of_values =
            resolver.get_long(keys::NUMBER_OF_SECOND_ORDER_PACKED_VALUES)?;
        let binary_scale_factor = resolver.get_long(keys::BINARY_SCALE_FACTOR)?;
        let decimal_scale_factor = resolver.get_long(keys::DECIMAL_SCALE_FACTOR)?;
        let reference_value = resolver.get_double(keys::REFERENCE_VALUE)?;

        debug_assert!((0..=64).contains(&width_of_first_order_values));

        Ok(SecondOrderParams {
            number_of_groups: number_of_groups as usize,
            width_of_first_order_values: width_of_first_order_values as u32,
            number_of_values: number_of_values as usize,
            binary_scale_factor,
            decimal_scale_factor,
            reference_value,
        })
    }
}

/// Decoder for one GRIB Edition-1 second-order packed data block.
///
/// Stateless: every call to `decode_f64`/`decode_f32` resolves its own
/// parameters through the supplied [`KeyResolver`] and owns its own
/// transient buffers for the duration of the call. Nothing is cached
/// between calls, and nothing here mutates the message handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecondOrderDecoder {
    _options: SecondOrderDecoderOptions,
}

impl SecondOrderDecoder {
    /// Creates a decoder with default options.
    pub fn new() -> Self {
        Self::with_options(SecondOrderDecoderOptions::default())
    }

    /// Creates a decoder with the given options.
    pub fn with_options(options: SecondOrderDecoderOptions) -> Self {
        SecondOrderDecoder { _options: options }
    }

    /// Cheaply returns the number of values this block will decode to,
    /// without parsing the bitmap, first-order values, or residuals. Lets a
    /// caller size an output buffer before calling `decode_f64`/`decode_f32`.
    pub fn value_count(&self, resolver: &dyn KeyResolver) -> Result<usize> {
        let n = resolver.get_long(keys::NUMBER_OF_SECOND_ORDER_PACKED_VALUES)?;
        Ok(n as usize)
    }

    /// Decodes into a caller-provided `f64` buffer, returning the number of
    /// values written (`out[..n]`). On any failure, `out` is left
    /// untouched.
    pub fn decode_f64(
        &self,
        resolver: &dyn KeyResolver,
        buf: &[u8],
        byte_offset: usize,
        out: &mut [f64],
    ) -> Result<usize> {
        let values = self.decode_shared(resolver, buf, byte_offset, out.len())?;
        out[..values.len()].copy_from_slice(&values);
        Ok(values.len())
    }

    /// Decodes into a caller-provided `f32` buffer, returning the number of
    /// values written (`out[..n]`). On any failure, `out` is left
    /// untouched. All arithmetic is performed in double precision; the
    /// narrowing cast to `f32` happens only at this final write, never
    /// mid-computation.
    pub fn decode_f32(
        &self,
        resolver: &dyn KeyResolver,
        buf: &[u8],
        byte_offset: usize,
        out: &mut [f32],
    ) -> Result<usize> {
        let values = self.decode_shared(resolver, buf, byte_offset, out.len())?;
        for (dst, src) in out.iter_mut().zip(values.iter()) {
            *dst = *src as f32;
        }
        Ok(values.len())
    }

    /// The encode side of this accessor does not implement packing: it
    /// records the packing variant name and delegates to the generic
    /// values setter. This returns that literal name; any real re-packing
    /// is the caller's concern, not this decoder's.
    pub fn encode_redirect(&self) -> &'static str {
        "grid_second_order"
    }

    fn decode_shared(
        &self,
        resolver: &dyn KeyResolver,
        buf: &[u8],
        byte_offset: usize,
        out_len: usize,
    ) -> Result<Vec<f64>> {
        let params = SecondOrderParams::resolve(resolver)?;

        if out_len < params.number_of_values {
            return array_too_small_error(params.number_of_values, out_len);
        }

        log::debug!(
            "gribkit: second-order decode: groups={} values={}",
            params.number_of_groups,
            params.number_of_values
        );

        let group_widths =
            resolver.get_long_array(keys::GROUP_WIDTHS, params.number_of_groups)?;

        let n_v = params.number_of_values;
        let n_g = params.number_of_groups;

        let mut cursor = BitCursor::new(buf, byte_offset);

        // Secondary bitmap, plus a sentinel `1` at index N_V so the final
        // group's length scan always terminates without a special case.
        let mut secondary_bitmap = vec![0u8; n_v + 1];
        for bit in secondary_bitmap.iter_mut().take(n_v) {
            *bit = cursor.read_unsigned(1) as u8;
        }
        secondary_bitmap[n_v] = 1;
        cursor.align_to_byte();

        let mut first_order_values = vec![0i64; n_g];
        for value in first_order_values.iter_mut() {
            *value = cursor.read_unsigned(params.width_of_first_order_values) as i64;
        }
        cursor.align_to_byte();

        let x = Self::decode_residuals(
            &mut cursor,
            &secondary_bitmap,
            &first_order_values,
            &group_widths,
            n_v,
            n_g,
        )?;

        let values = x
            .iter()
            .map(|&raw| {
                scaling::apply(
                    raw,
                    params.binary_scale_factor,
                    params.decimal_scale_factor,
                    params.reference_value,
                )
            })
            .collect();

        Ok(values)
    }

    /// Walks the secondary bitmap, grouping consecutive elements between
    /// `1` bits, and reconstructs `X[0..N_V)` by adding each group's
    /// first-order value to its (possibly zero-width) residuals.
    fn decode_residuals(
        cursor: &mut BitCursor<'_>,
        secondary_bitmap: &[u8],
        first_order_values: &[i64],
        group_widths: &[i64],
        n_v: usize,
        n_g: usize,
    ) -> Result<Vec<i64>> {
        let mut x = vec![0i64; n_v];
        let mut n = 0usize;
        let mut group: isize = -1;
        let mut groups_seen = 0usize;

        while n < n_v {
            if secondary_bitmap[n] != 1 {
                return internal_error("secondary bitmap group did not start at a set bit");
            }

            groups_seen += 1;
            group += 1;

            let group_index = group as usize;
            if group_index >= n_g {
                return internal_error(
                    "secondary bitmap set more bits than numberOfGroups allows",
                );
            }

            let mut group_length = 1usize;
            while secondary_bitmap[n + group_length] != 1 {
                group_length += 1;
            }

            let width = group_widths[group_index] as u32;
            debug_assert!(width <= 64);

            if width > 0 {
                for j in 0..group_length {
                    let residual = cursor.read_unsigned(width) as i64;
                    x[n + j] = first_order_values[group_index] + residual;
                }
            } else {
                for slot in x[n..n + group_length].iter_mut() {
                    *slot = first_order_values[group_index];
                }
            }

            n += group_length;
        }

        if groups_seen != n_g {
            return internal_error("secondary bitmap 1-count does not equal numberOfGroups");
        }

        Ok(x)
    }
}
