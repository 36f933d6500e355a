//! Compression pipeline: lane-parallel LZ77 followed by static
//! Huffman coding.

pub mod deflate;
pub mod huffman;
pub mod lz77;

pub use deflate::{deflate, deflate_words, encode_fixed_huffman};
pub use lz77::{Lz77Compressor, Token};
