//! Decompression pipeline: Huffman decoding back to the token stream,
//! then LZ77 expansion to plaintext.

pub mod bit_reader;
pub mod inflate;
pub mod lookup;
pub mod lz77;

pub use inflate::{inflate, inflate_into, inflate_tokens, inflate_words};
