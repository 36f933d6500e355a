//! # laneflate
//!
//! A lane-parallel DEFLATE compressor and decompressor.
//!
//! The compressor searches [`compress::lz77::LANES`] input positions
//! per cycle against as many hash-indexed dictionaries — a software
//! rendering of a hardware match-search pipeline — and codes the
//! resulting literal/match token stream with DEFLATE's fixed Huffman
//! tables. Output is a single final block, readable by any RFC 1951
//! inflater. The decompressor accepts single-block stored, fixed, and
//! dynamic streams, building two-level lookup tables for the dynamic
//! case.
//!
//! ## Example
//!
//! ```rust
//! let data = b"an example, an example";
//! let compressed = laneflate::deflate(data);
//! let restored = laneflate::inflate(&compressed).unwrap();
//! assert_eq!(restored, data);
//! ```
//!
//! The intermediate token stream is part of the public model: the
//! pipeline halves can be driven separately via
//! [`compress::Lz77Compressor`], [`compress::encode_fixed_huffman`],
//! [`decode::inflate_tokens`], and [`decode::lz77::expand`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod compress;
pub mod decode;
pub mod error;

pub use compress::deflate::{deflate, deflate_words};
pub use compress::lz77::Token;
pub use decode::inflate::{inflate, inflate_into, inflate_words};
pub use error::{Error, Result};
