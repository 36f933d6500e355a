//! DEFLATE compression (RFC 1951), static-Huffman mode.
//!
//! Combines the lane-parallel LZ77 match search with fixed Huffman
//! coding. The output is a single final block and is bit-compatible
//! with any RFC 1951 inflater.

use crate::bits::{bytes_to_words, words_to_bytes, BitWriter};
use crate::compress::huffman;
use crate::compress::lz77::{Lz77Compressor, Token};

/// Smallest match length in each length-code bucket (symbols 257-285),
/// per RFC 1951 §3.2.5.
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits carried after each length code.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Smallest distance in each distance-code bucket (symbols 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits carried after each distance code.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Decompose a match length into (symbol, extra bit count, extra value).
fn length_code(length: u16) -> (u16, u8, u16) {
    debug_assert!((3..=258).contains(&length), "Invalid length: {}", length);

    // The bucket is the last one whose base does not exceed the length.
    let bucket = LENGTH_BASE
        .iter()
        .rposition(|&base| base <= length)
        .expect("length below minimum");
    (
        257 + bucket as u16,
        LENGTH_EXTRA[bucket],
        length - LENGTH_BASE[bucket],
    )
}

/// Decompose a match distance into (symbol, extra bit count, extra value).
fn distance_code(distance: u16) -> (u16, u8, u16) {
    debug_assert!(distance >= 1, "Invalid distance");

    let bucket = DISTANCE_BASE
        .iter()
        .rposition(|&base| base <= distance)
        .expect("distance below minimum");
    (
        bucket as u16,
        DISTANCE_EXTRA[bucket],
        distance - DISTANCE_BASE[bucket],
    )
}

/// Compress data into a single static-Huffman DEFLATE block.
///
/// Returns raw DEFLATE bytes (no zlib/gzip wrapper). An empty input
/// produces the minimal 10-bit block: header plus end-of-block.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut lz77 = Lz77Compressor::new();
    let tokens = lz77.compress(data);
    encode_fixed_huffman(&tokens)
}

/// Word-transport wrapper around [`deflate`]: `words` carry the
/// plaintext 4 bytes per word in network order, `len` is the plaintext
/// byte count. The compressed stream comes back in the same packing,
/// zero-padded to a word boundary.
pub fn deflate_words(words: &[u32], len: usize) -> Vec<u32> {
    let bytes = words_to_bytes(words);
    bytes_to_words(&deflate(&bytes[..len.min(bytes.len())]))
}

/// Encode tokens using fixed Huffman codes.
pub fn encode_fixed_huffman(tokens: &[Token]) -> Vec<u8> {
    let lit_codes = huffman::fixed_literal_codes();
    let dist_codes = huffman::fixed_distance_codes();

    let mut writer = BitWriter::with_capacity(tokens.len() / 2 + 16);

    // Block header: BFINAL=1 (last block), BTYPE=01 (fixed Huffman).
    writer.write_bit(true);
    writer.write_bits_rev(0b01, 2);

    for token in tokens {
        match *token {
            Token::Literal(byte) => {
                let code = lit_codes[byte as usize];
                writer.write_bits(code.code as u32, code.length);
            }
            Token::Match { length, distance } => {
                // Encode length
                let (len_symbol, len_extra_bits, len_extra_value) = length_code(length);
                let len_code = lit_codes[len_symbol as usize];
                writer.write_bits(len_code.code as u32, len_code.length);

                if len_extra_bits > 0 {
                    writer.write_bits_rev(len_extra_value as u32, len_extra_bits);
                }

                // Encode distance
                let (dist_symbol, dist_extra_bits, dist_extra_value) = distance_code(distance);
                let dist_code = dist_codes[dist_symbol as usize];
                writer.write_bits(dist_code.code as u32, dist_code.length);

                if dist_extra_bits > 0 {
                    writer.write_bits_rev(dist_extra_value as u32, dist_extra_bits);
                }
            }
        }
    }

    // End of block symbol (256)
    let eob_code = lit_codes[256];
    writer.write_bits(eob_code.code as u32, eob_code.length);

    writer.finish()
}
