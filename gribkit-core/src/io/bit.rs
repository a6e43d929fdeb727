// GribKit
// Copyright (c) 2026 The GribKit Contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// `BitCursor` reads unsigned integers of an arbitrary bit width from an
/// in-memory buffer, most-significant-bit first, advancing a running bit
/// position as it goes.
///
/// Unlike [`symphonia_core::io::bit::BitReaderLtr`], which this is modelled
/// on, `BitCursor` does not maintain a fetch-ahead bit cache: GRIB second-order
/// data is read in three short, unpredictably-widthed passes (bitmap,
/// first-order values, residuals) rather than one hot per-sample loop, so a
/// direct byte-indexed extraction is simpler and just as fast in practice.
///
/// Exhausting the buffer is a caller contract violation, not a reported
/// error: callers are expected to validate the required byte range up front
/// (see the decoder's own capacity check) before ever touching the cursor.
pub struct BitCursor<'a> {
    buf: &'a [u8],
    bit_pos: u64,
}

impl<'a> BitCursor<'a> {
    /// Creates a cursor over `buf`, positioned at bit 0 of `start_byte`.
    pub fn new(buf: &'a [u8], start_byte: usize) -> Self {
        BitCursor { buf, bit_pos: (start_byte as u64) * 8 }
    }

    /// The current absolute bit position, measured from the start of `buf`.
    pub fn bit_pos(&self) -> u64 {
        self.bit_pos
    }

    /// The current bit position rounded up to the containing byte.
    pub fn byte_pos(&self) -> usize {
        ((self.bit_pos + 7) / 8) as usize
    }

    /// Reads `width` bits (0..=64) as a big-endian unsigned integer and
    /// advances the cursor by `width` bits. Width 0 returns 0 and does not
    /// advance the cursor.
    ///
    /// `width` above 64 is undefined behaviour for the caller to avoid; this
    /// is checked only in debug builds, matching the numeric helpers'
    /// contract-check convention (see [`crate::numeric`]).
    pub fn read_unsigned(&mut self, width: u32) -> u64 {
        debug_assert!(width <= 64);

        if width == 0 {
            return 0;
        }

        let mut value: u64 = 0;
        let mut remaining = width;
        let mut bit_pos = self.bit_pos;

        while remaining > 0 {
            let byte_idx = (bit_pos >> 3) as usize;
            let bit_in_byte = (bit_pos & 7) as u32;
            let bits_left_in_byte = 8 - bit_in_byte;
            let take = remaining.min(bits_left_in_byte);

            let byte = self.buf[byte_idx] as u64;
            let shift = bits_left_in_byte - take;
            let mask = (1u64 << take) - 1;

            value = (value << take) | ((byte >> shift) & mask);

            remaining -= take;
            bit_pos += u64::from(take);
        }

        self.bit_pos = bit_pos;
        value
    }

    /// Reads `out.len()` unsigned values of `width` bits each, in order.
    pub fn read_unsigned_array(&mut self, width: u32, out: &mut [u64]) {
        for slot in out.iter_mut() {
            *slot = self.read_unsigned(width);
        }
    }

    /// Rounds the cursor up to the next byte boundary, the padding
    /// convention used between the bitmap, first-order value, and residual
    /// sections of a second-order packed block.
    pub fn align_to_byte(&mut self) {
        self.bit_pos = (self.bit_pos + 7) & !7;
    }
}

#[cfg(test)]
mod tests {
    use super::BitCursor;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn reads_big_endian_bits_at_arbitrary_offsets() {
        // 0b10110100_11000001
        let buf = [0b1011_0100, 0b1100_0001];
        let mut cur = BitCursor::new(&buf, 0);

        assert_eq!(cur.read_unsigned(4), 0b1011);
        assert_eq!(cur.read_unsigned(4), 0b0100);
        assert_eq!(cur.read_unsigned(8), 0b1100_0001);
    }

    #[test]
    fn width_zero_reads_zero_without_advancing() {
        let buf = [0xFFu8];
        let mut cur = BitCursor::new(&buf, 0);
        assert_eq!(cur.read_unsigned(0), 0);
        assert_eq!(cur.bit_pos(), 0);
        assert_eq!(cur.read_unsigned(8), 0xFF);
    }

    #[test]
    fn crosses_byte_boundaries() {
        // 12-bit value spanning three bytes: bits 4..16
        let buf = [0b0000_1010, 0b1100_1111, 0b0000_0000];
        let mut cur = BitCursor::new(&buf, 0);
        assert_eq!(cur.read_unsigned(4), 0);
        assert_eq!(cur.read_unsigned(12), 0b1010_1100_1111);
    }

    #[test]
    fn align_to_byte_rounds_up() {
        let buf = [0u8; 4];
        let mut cur = BitCursor::new(&buf, 0);
        cur.read_unsigned(3);
        cur.align_to_byte();
        assert_eq!(cur.bit_pos(), 8);

        cur.align_to_byte();
        assert_eq!(cur.bit_pos(), 8, "already aligned, should not move");
    }

    #[test]
    fn starts_at_given_byte_offset() {
        let buf = [0x00, 0xAB];
        let mut cur = BitCursor::new(&buf, 1);
        assert_eq!(cur.read_unsigned(8), 0xAB);
    }

    #[test]
    fn round_trips_arbitrary_widths() {
        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);

        for _ in 0..64 {
            let width = rng.random_range(1..=32u32);
            let n = rng.random_range(1..=40usize);
            let max = if width == 32 { u32::MAX as u64 } else { (1u64 << width) - 1 };

            let values: Vec<u64> = (0..n).map(|_| rng.random_range(0..=max)).collect();

            // Pack the values MSB-first into a byte buffer, padded with zero bits.
            let total_bits = n as u64 * width as u64;
            let mut buf = vec![0u8; ((total_bits + 7) / 8) as usize];
            let mut bit_pos = 0u64;
            for &v in &values {
                for b in (0..width).rev() {
                    if v & (1 << b) != 0 {
                        let byte_idx = (bit_pos >> 3) as usize;
                        let bit_in_byte = 7 - (bit_pos & 7) as u32;
                        buf[byte_idx] |= 1 << bit_in_byte;
                    }
                    bit_pos += 1;
                }
            }

            let mut cur = BitCursor::new(&buf, 0);
            let mut out = vec![0u64; n];
            cur.read_unsigned_array(width, &mut out);

            assert_eq!(out, values, "round-trip mismatch at width={}", width);
        }
    }
}
