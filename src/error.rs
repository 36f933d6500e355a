//! Error types for the laneflate library.

use thiserror::Error;

/// Result type alias for laneflate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a compressed stream.
///
/// Every variant carries a position: a bit offset into the compressed
/// stream for bitstream-level failures, or a byte offset into the
/// produced output for back-reference and buffer failures. Decoding
/// stops at the first error; no partial output is guaranteed valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A block header announced the reserved block type `11`.
    #[error("reserved block type at bit {at}")]
    InvalidBlockType {
        /// Bit offset of the block header.
        at: usize,
    },
    /// The stream starts with a non-final block; only single final
    /// blocks are supported.
    #[error("non-final block at bit {at}: multi-block streams are not supported")]
    NonFinalBlock {
        /// Bit offset of the block header.
        at: usize,
    },
    /// A bit pattern that maps to no symbol of the active prefix code,
    /// or a malformed code description (oversubscribed lengths, bad
    /// repeat sequences).
    #[error("invalid prefix code at bit {at}")]
    InvalidCode {
        /// Bit offset where decoding failed.
        at: usize,
    },
    /// A literal/length symbol outside the defined alphabet.
    #[error("invalid length symbol {symbol} at bit {at}")]
    InvalidLength {
        /// The offending symbol.
        symbol: u16,
        /// Bit offset where the symbol was decoded.
        at: usize,
    },
    /// A distance symbol above 29, or a back-reference that reaches
    /// behind the start of the output.
    #[error("invalid distance {distance} at offset {at}")]
    InvalidDistance {
        /// The offending distance (or distance symbol).
        distance: u32,
        /// Bit offset (symbol case) or output byte offset (reach case).
        at: usize,
    },
    /// The input ended before the end-of-block symbol.
    #[error("truncated input at bit {at}")]
    TruncatedInput {
        /// Bit offset where more input was required.
        at: usize,
    },
    /// A stored block's LEN and NLEN fields are not complements.
    #[error("stored block length mismatch at bit {at}")]
    InvalidStoredLength {
        /// Bit offset of the LEN field.
        at: usize,
    },
    /// Decompressed data does not fit the caller-supplied buffer.
    #[error("output overflow: need at least {needed} bytes, buffer holds {capacity}")]
    OutputOverflow {
        /// Minimum output size required to make progress.
        needed: usize,
        /// Capacity of the buffer that was provided.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidBlockType { at: 0 };
        assert_eq!(err.to_string(), "reserved block type at bit 0");

        let err = Error::OutputOverflow {
            needed: 10,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "output overflow: need at least 10 bytes, buffer holds 4"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
