//! Table-driven prefix-code decoding with two-level lookup.
//!
//! The first level is indexed by a fixed number of upcoming bits; every
//! code no longer than that width fills all entries sharing its prefix.
//! Longer codes escape to a second-level sub-table keyed by the
//! remaining bits, sized per first-level prefix to the longest code
//! behind it.

use crate::compress::huffman::{codes_from_lengths, MAX_CODE_LENGTH};
use crate::decode::bit_reader::BitReader;
use crate::error::{Error, Result};

/// One lookup entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// No code reaches this entry (incomplete code set).
    Invalid,
    /// A directly decodable symbol; `length` is the full code length.
    Symbol { symbol: u16, length: u8 },
    /// Codes longer than the first level continue in the sub-table at
    /// `base`, indexed by the next `bits` bits.
    Escape { base: u32, bits: u8 },
}

/// Prefix-code decoding table built from canonical code lengths.
pub struct LookupTable {
    bits: u8,
    primary: Vec<Entry>,
    secondary: Vec<Entry>,
}

impl LookupTable {
    /// Build a table with a `bits`-wide first level from per-symbol
    /// code lengths. `at` is the bit offset reported if the length
    /// multiset oversubscribes the code space.
    pub fn from_lengths(lengths: &[u8], bits: u8, at: usize) -> Result<Self> {
        debug_assert!(lengths.iter().all(|&l| l as usize <= MAX_CODE_LENGTH));

        // Reject oversubscribed length sets before assigning codes;
        // their canonical codes would overflow the table indices.
        let mut count_per_len = [0i64; MAX_CODE_LENGTH + 1];
        for &len in lengths {
            count_per_len[len as usize] += 1;
        }
        count_per_len[0] = 0;
        let mut open_slots = 1i64;
        for count in count_per_len.iter().skip(1) {
            open_slots = (open_slots << 1) - count;
            if open_slots < 0 {
                return Err(Error::InvalidCode { at });
            }
        }

        let codes = codes_from_lengths(lengths);
        let mut primary = vec![Entry::Invalid; 1 << bits];

        // Short codes fill every first-level entry sharing their prefix.
        for (symbol, code) in codes.iter().enumerate() {
            if code.length == 0 || code.length > bits {
                continue;
            }
            let start = (code.code as usize) << (bits - code.length);
            let repeat = 1usize << (bits - code.length);
            for entry in primary.iter_mut().skip(start).take(repeat) {
                *entry = Entry::Symbol {
                    symbol: symbol as u16,
                    length: code.length,
                };
            }
        }

        // Size one sub-table per first-level prefix that long codes share.
        let mut sub_bits = vec![0u8; 1 << bits];
        for code in codes.iter().filter(|c| c.length > bits) {
            let prefix = (code.code >> (code.length - bits)) as usize;
            sub_bits[prefix] = sub_bits[prefix].max(code.length - bits);
        }

        let mut secondary = Vec::new();
        for (prefix, &width) in sub_bits.iter().enumerate() {
            if width > 0 {
                primary[prefix] = Entry::Escape {
                    base: secondary.len() as u32,
                    bits: width,
                };
                secondary.resize(secondary.len() + (1 << width), Entry::Invalid);
            }
        }

        for (symbol, code) in codes.iter().enumerate() {
            if code.length <= bits {
                continue;
            }
            let prefix = (code.code >> (code.length - bits)) as usize;
            let Entry::Escape { base, bits: width } = primary[prefix] else {
                unreachable!("long code prefix must escape");
            };
            let rem_len = code.length - bits;
            let rem = (code.code as usize) & ((1 << rem_len) - 1);
            let start = base as usize + (rem << (width - rem_len));
            let repeat = 1usize << (width - rem_len);
            for entry in secondary.iter_mut().skip(start).take(repeat) {
                *entry = Entry::Symbol {
                    symbol: symbol as u16,
                    length: code.length,
                };
            }
        }

        Ok(Self {
            bits,
            primary,
            secondary,
        })
    }

    /// Decode one symbol from the reader.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u16> {
        let index = reader.peek_bits(self.bits) as usize;
        match self.primary[index] {
            Entry::Symbol { symbol, length } => {
                reader.consume(length)?;
                Ok(symbol)
            }
            Entry::Escape { base, bits } => {
                reader.consume(self.bits)?;
                let sub = reader.peek_bits(bits) as usize;
                match self.secondary[base as usize + sub] {
                    Entry::Symbol { symbol, length } => {
                        reader.consume(length - self.bits)?;
                        Ok(symbol)
                    }
                    _ => Err(Error::InvalidCode {
                        at: reader.bit_position(),
                    }),
                }
            }
            Entry::Invalid => Err(Error::InvalidCode {
                at: reader.bit_position(),
            }),
        }
    }
}
