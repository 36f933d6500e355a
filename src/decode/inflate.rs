//! DEFLATE decompression (RFC 1951) for single final blocks.
//!
//! The decoder front half turns the bit stream back into the
//! literal/match token stream; [`crate::decode::lz77`] expands tokens
//! into plaintext. Static blocks decode by range tests on the next
//! 7/8/9 bits; dynamic blocks build two-level lookup tables from the
//! transmitted code lengths. Stored blocks are copied verbatim.

use crate::bits::{bytes_to_words, words_to_bytes};
use crate::compress::lz77::Token;
use crate::decode::bit_reader::BitReader;
use crate::decode::lookup::LookupTable;
use crate::decode::lz77::{expand, expand_into};
use crate::error::{Error, Result};

/// Smallest match length in each length-code bucket (symbols 257-285),
/// matching the encoder's decomposition tables.
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

/// Transmission order of the code-length code lengths in a dynamic
/// block header.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// First-level index widths of the three lookup tables.
const LIT_TABLE_BITS: u8 = 9;
const DIST_TABLE_BITS: u8 = 6;
const CCL_TABLE_BITS: u8 = 7;

/// Decompress a single-block DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let tokens = inflate_tokens(data)?;
    expand(&tokens)
}

/// Decompress into a caller-supplied buffer; returns the number of
/// bytes written. Fails with [`Error::OutputOverflow`] if the buffer is
/// too small.
pub fn inflate_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let tokens = inflate_tokens(data)?;
    expand_into(&tokens, out)
}

/// Word-transport wrapper around [`inflate`]: 4 bytes per word in
/// network order on both sides. Returns the plaintext words and the
/// plaintext byte count (the final word is zero-padded).
pub fn inflate_words(words: &[u32]) -> Result<(Vec<u32>, usize)> {
    let bytes = words_to_bytes(words);
    let out = inflate(&bytes)?;
    Ok((bytes_to_words(&out), out.len()))
}

/// Decode the bit stream into the intermediate token stream without
/// expanding back-references.
pub fn inflate_tokens(data: &[u8]) -> Result<Vec<Token>> {
    let mut reader = BitReader::new(data);

    let bfinal = reader.read_bits(1)?;
    let btype = reader.read_bits_rev(2)?;
    if btype == 3 {
        return Err(Error::InvalidBlockType { at: 0 });
    }
    if bfinal == 0 {
        return Err(Error::NonFinalBlock { at: 0 });
    }

    let mut tokens = Vec::new();
    match btype {
        0 => decode_stored(&mut reader, &mut tokens)?,
        1 => decode_static(&mut reader, &mut tokens)?,
        2 => decode_dynamic(&mut reader, &mut tokens)?,
        _ => unreachable!(),
    }
    Ok(tokens)
}

/// Read the extra bits of a length symbol and return the match length.
fn read_length(symbol: u16, reader: &mut BitReader) -> Result<u16> {
    if symbol > 285 {
        return Err(Error::InvalidLength {
            symbol,
            at: reader.bit_position(),
        });
    }
    let index = (symbol - 257) as usize;
    let extra = reader.read_bits_rev(LENGTH_EXTRA[index])?;
    Ok(LENGTH_BASE[index] + extra as u16)
}

/// Read the extra bits of a distance symbol and return the distance.
fn read_distance(symbol: u16, reader: &mut BitReader) -> Result<u16> {
    if symbol > 29 {
        return Err(Error::InvalidDistance {
            distance: symbol as u32,
            at: reader.bit_position(),
        });
    }
    let index = symbol as usize;
    let extra = reader.read_bits_rev(DISTANCE_EXTRA[index])?;
    Ok(DISTANCE_BASE[index] + extra as u16)
}

/// Decode a stored (uncompressed) block into literal tokens.
fn decode_stored(reader: &mut BitReader, tokens: &mut Vec<Token>) -> Result<()> {
    reader.align_to_byte()?;
    let at = reader.bit_position();

    // LEN and NLEN, little-endian.
    let len = reader.read_bits_rev(8)? | (reader.read_bits_rev(8)? << 8);
    let nlen = reader.read_bits_rev(8)? | (reader.read_bits_rev(8)? << 8);
    if len ^ nlen != 0xFFFF {
        return Err(Error::InvalidStoredLength { at });
    }

    tokens.reserve(len as usize);
    for _ in 0..len {
        tokens.push(Token::Literal(reader.read_byte()?));
    }
    Ok(())
}

/// Decode a block coded with the fixed Huffman tables.
///
/// The fixed code space partitions exactly on the next 7, 8, or 9 bits,
/// so symbols resolve by range tests instead of a lookup table.
fn decode_static(reader: &mut BitReader, tokens: &mut Vec<Token>) -> Result<()> {
    loop {
        let peek8 = reader.peek_bits(8);
        let symbol = if (0x30..=0xBF).contains(&peek8) {
            // Literals 0-143, 8-bit codes based at 0b00110000.
            reader.consume(8)?;
            tokens.push(Token::Literal((peek8 - 0x30) as u8));
            continue;
        } else if (0xC0..=0xC7).contains(&peek8) {
            // Symbols 280-287, 8-bit codes based at 0b11000000.
            reader.consume(8)?;
            (280 + peek8 - 0xC0) as u16
        } else if peek8 < 0x30 {
            // 7-bit codes: end-of-block and lengths 256-279.
            let peek7 = reader.peek_bits(7);
            reader.consume(7)?;
            if peek7 == 0 {
                return Ok(());
            }
            (256 + peek7) as u16
        } else {
            // Literals 144-255, 9-bit codes based at 0b110010000.
            let peek9 = reader.peek_bits(9);
            reader.consume(9)?;
            tokens.push(Token::Literal((peek9 - 0x190 + 144) as u8));
            continue;
        };

        let length = read_length(symbol, reader)?;
        let dist_symbol = reader.read_bits(5)? as u16;
        let distance = read_distance(dist_symbol, reader)?;
        tokens.push(Token::Match { length, distance });
    }
}

/// Decode a block coded with transmitted (dynamic) Huffman tables.
fn decode_dynamic(reader: &mut BitReader, tokens: &mut Vec<Token>) -> Result<()> {
    let hlit = reader.read_bits_rev(5)? as usize + 257;
    let hdist = reader.read_bits_rev(5)? as usize + 1;
    let hclen = reader.read_bits_rev(4)? as usize + 4;
    if hlit > 286 {
        return Err(Error::InvalidCode {
            at: reader.bit_position(),
        });
    }

    // Code-length code lengths arrive in the fixed permutation order.
    let mut ccl_lengths = [0u8; 19];
    for &position in CODE_LENGTH_ORDER.iter().take(hclen) {
        ccl_lengths[position] = reader.read_bits_rev(3)? as u8;
    }
    let ccl_table =
        LookupTable::from_lengths(&ccl_lengths, CCL_TABLE_BITS, reader.bit_position())?;

    // The literal/length and distance code lengths form one sequence;
    // a repeat may cross the boundary between the two alphabets.
    let mut lengths = vec![0u8; hlit + hdist];
    let mut filled = 0;
    while filled < lengths.len() {
        let symbol = ccl_table.decode(reader)?;
        match symbol {
            0..=15 => {
                lengths[filled] = symbol as u8;
                filled += 1;
            }
            16 => {
                if filled == 0 {
                    return Err(Error::InvalidCode {
                        at: reader.bit_position(),
                    });
                }
                let repeat = reader.read_bits_rev(2)? as usize + 3;
                if filled + repeat > lengths.len() {
                    return Err(Error::InvalidCode {
                        at: reader.bit_position(),
                    });
                }
                let previous = lengths[filled - 1];
                for _ in 0..repeat {
                    lengths[filled] = previous;
                    filled += 1;
                }
            }
            17 | 18 => {
                let repeat = if symbol == 17 {
                    reader.read_bits_rev(3)? as usize + 3
                } else {
                    reader.read_bits_rev(7)? as usize + 11
                };
                if filled + repeat > lengths.len() {
                    return Err(Error::InvalidCode {
                        at: reader.bit_position(),
                    });
                }
                filled += repeat; // already zero
            }
            _ => unreachable!("code length alphabet has 19 symbols"),
        }
    }

    // Zero-pad to the full alphabets before building the tables.
    let mut lit_lengths = [0u8; 286];
    lit_lengths[..hlit].copy_from_slice(&lengths[..hlit]);
    let lit_table =
        LookupTable::from_lengths(&lit_lengths, LIT_TABLE_BITS, reader.bit_position())?;

    let mut dist_lengths = [0u8; 32];
    dist_lengths[..hdist].copy_from_slice(&lengths[hlit..]);
    let dist_table =
        LookupTable::from_lengths(&dist_lengths, DIST_TABLE_BITS, reader.bit_position())?;

    loop {
        let symbol = lit_table.decode(reader)?;
        match symbol {
            0..=255 => tokens.push(Token::Literal(symbol as u8)),
            256 => return Ok(()),
            _ => {
                let length = read_length(symbol, reader)?;
                let dist_symbol = dist_table.decode(reader)?;
                let distance = read_distance(dist_symbol, reader)?;
                tokens.push(Token::Match { length, distance });
            }
        }
    }
}
