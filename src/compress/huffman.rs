//! Canonical Huffman codes for DEFLATE.
//!
//! A code is fully described by its per-symbol bit lengths: within each
//! length, code values are consecutive integers in symbol order, and
//! each length's first value continues where the previous length left
//! off, doubled. This module derives `(code, length)` pairs from a
//! length array and caches the fixed tables of RFC 1951 §3.2.6.

use std::sync::LazyLock;

/// DEFLATE codes never exceed 15 bits.
pub const MAX_CODE_LENGTH: usize = 15;

/// One prefix code: value plus the number of bits that are significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCode {
    /// Code value, read MSB-first over `length` bits.
    pub code: u16,
    /// Significant bit count; 0 means the symbol has no code.
    pub length: u8,
}

/// Derive the canonical code for a set of per-symbol bit lengths.
///
/// Symbols with length 0 take no part in the code.
pub fn codes_from_lengths(lengths: &[u8]) -> Vec<HuffmanCode> {
    // Population of each bit length. Length 0 is counted and then
    // cleared so it cannot shift the bases below.
    let mut count_per_len = [0u32; MAX_CODE_LENGTH + 1];
    for &len in lengths {
        count_per_len[len as usize] += 1;
    }
    count_per_len[0] = 0;

    // Base value for each length: everything shorter, left-shifted once.
    let mut first_code = [0u32; MAX_CODE_LENGTH + 1];
    let mut accum = 0u32;
    for len in 1..=MAX_CODE_LENGTH {
        accum = (accum + count_per_len[len - 1]) << 1;
        first_code[len] = accum;
    }

    // Hand out consecutive values in symbol order.
    let mut codes = vec![HuffmanCode::default(); lengths.len()];
    for (symbol, &len) in lengths.iter().enumerate() {
        if len != 0 {
            codes[symbol] = HuffmanCode {
                code: first_code[len as usize] as u16,
                length: len,
            };
            first_code[len as usize] += 1;
        }
    }

    codes
}

/// Per-symbol code lengths of the fixed literal/length alphabet,
/// straight from the table in RFC 1951 §3.2.6.
pub fn fixed_literal_lengths() -> [u8; 288] {
    std::array::from_fn(|symbol| match symbol {
        144..=255 => 9,
        256..=279 => 7,
        _ => 8, // 0..=143 and 280..=287
    })
}

static FIXED_LITERAL_CODES: LazyLock<Vec<HuffmanCode>> =
    LazyLock::new(|| codes_from_lengths(&fixed_literal_lengths()));

static FIXED_DISTANCE_CODES: LazyLock<Vec<HuffmanCode>> =
    LazyLock::new(|| codes_from_lengths(&[5u8; 32]));

/// Fixed codes for the literal/length alphabet (symbols 0-287),
/// built once and shared.
#[inline]
pub fn fixed_literal_codes() -> &'static [HuffmanCode] {
    &FIXED_LITERAL_CODES
}

/// Fixed codes for the distance alphabet (symbols 0-31), built once
/// and shared. All 32 codes are 5 bits, so each code equals its symbol.
#[inline]
pub fn fixed_distance_codes() -> &'static [HuffmanCode] {
    &FIXED_DISTANCE_CODES
}
