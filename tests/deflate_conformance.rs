//! End-to-end conformance tests.
//!
//! Round-trips the full pipeline over crafted and random corpora and
//! cross-checks the wire format against flate2 in both directions: our
//! static-mode output must be readable by a stock inflater, and our
//! decoder must accept single-block streams from a stock deflater.

use std::io::{Read, Write};

use flate2::Compression;
use laneflate::bits::{bytes_to_words, words_to_bytes};
use laneflate::compress::Lz77Compressor;
use laneflate::{deflate, deflate_words, inflate, inflate_into, inflate_words, Error, Token};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn flate2_inflate(data: &[u8]) -> Vec<u8> {
    let mut decoder = flate2::read::DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).expect("flate2 decode");
    out
}

fn flate2_deflate(data: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), level);
    encoder.write_all(data).expect("flate2 encode");
    encoder.finish().expect("flate2 finish")
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

fn pattern_text(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    while out.len() < len {
        out.extend_from_slice(pattern);
    }
    out.truncate(len);
    out
}

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn test_round_trip_known_vectors() {
    let vectors: &[&[u8]] = &[
        b"",
        b"a",
        b"Hello, world!",
        b"ababab",
        b"aaaaaaaa",
        b"@@@@ reserved bytes round-trip too @@@@",
        b"\x00\x01\x02\x03\xFC\xFD\xFE\xFF",
    ];
    for &data in vectors {
        assert_eq!(inflate(&deflate(data)).unwrap(), data, "vector {:?}", data);
    }
}

#[test]
fn test_round_trip_empty_is_ten_bits() {
    // Header plus end-of-block: exactly two bytes on the wire.
    let compressed = deflate(b"");
    assert_eq!(compressed, vec![0x03, 0x00]);
    assert_eq!(inflate(&compressed).unwrap(), b"");
}

#[test]
fn test_round_trip_random_sizes() {
    for (i, size) in [1, 3, 4, 5, 17, 100, 1000, 4096, 10000].iter().enumerate() {
        let data = random_bytes(*size, 0xC0FFEE + i as u64);
        assert_eq!(inflate(&deflate(&data)).unwrap(), data, "size {}", size);
    }
}

#[test]
fn test_round_trip_compressible() {
    let data = pattern_text(8192);
    let compressed = deflate(&data);
    assert!(compressed.len() < data.len() / 2);
    assert_eq!(inflate(&compressed).unwrap(), data);
}

#[test]
fn test_round_trip_long_runs() {
    for size in [8, 33, 100, 5000] {
        let data = vec![b'x'; size];
        assert_eq!(inflate(&deflate(&data)).unwrap(), data, "run {}", size);
    }
}

#[test]
fn test_round_trip_structured() {
    // Byte-aligned records with repeating headers, a shape the lane
    // matcher sees a lot of.
    let mut data = Vec::new();
    for i in 0u32..500 {
        data.extend_from_slice(b"RECORD:");
        data.extend_from_slice(&i.to_be_bytes());
    }
    assert_eq!(inflate(&deflate(&data)).unwrap(), data);
}

#[test]
fn test_unique_bytes_emit_only_literals() {
    // No repeated 3-byte substring: the token stream is pure literals.
    let data: Vec<u8> = (0..=255u8).collect();
    let tokens = Lz77Compressor::new().compress(&data);
    assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
    assert_eq!(tokens.len(), data.len());
}

// ============================================================================
// Differential against flate2
// ============================================================================

#[test]
fn test_flate2_reads_our_output() {
    let corpora: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"Hello, world!".to_vec(),
        pattern_text(4096),
        random_bytes(2048, 7),
        vec![0u8; 1000],
        (0..=255u8).cycle().take(3000).collect(),
    ];
    for data in corpora {
        let compressed = deflate(&data);
        assert_eq!(flate2_inflate(&compressed), data);
    }
}

#[test]
fn test_we_read_flate2_stored_blocks() {
    let data = pattern_text(1000);
    let compressed = flate2_deflate(&data, Compression::none());
    assert_eq!(inflate(&compressed).unwrap(), data);
}

#[test]
fn test_we_read_flate2_compressed_blocks() {
    // Small inputs come back as one final block (fixed or dynamic).
    let corpora: Vec<Vec<u8>> = vec![
        b"abc".to_vec(),
        pattern_text(2000),
        random_bytes(1500, 99),
        vec![b'z'; 4000],
    ];
    for data in corpora {
        for level in [Compression::fast(), Compression::default(), Compression::best()] {
            let compressed = flate2_deflate(&data, level);
            assert_eq!(
                inflate(&compressed).unwrap(),
                data,
                "level {:?}, len {}",
                level,
                data.len()
            );
        }
    }
}

// ============================================================================
// Word transport
// ============================================================================

#[test]
fn test_word_transport_round_trip() {
    let data = pattern_text(1021); // deliberately not word-aligned
    let words = bytes_to_words(&data);
    let compressed = deflate_words(&words, data.len());
    let (out_words, len) = inflate_words(&compressed).unwrap();
    assert_eq!(len, data.len());
    assert_eq!(&words_to_bytes(&out_words)[..len], &data[..]);
}

// ============================================================================
// Bounded output
// ============================================================================

#[test]
fn test_inflate_into_round_trip() {
    let data = pattern_text(512);
    let compressed = deflate(&data);

    let mut buf = vec![0u8; 512];
    assert_eq!(inflate_into(&compressed, &mut buf).unwrap(), data.len());
    assert_eq!(buf, data);

    let mut slack = vec![0u8; 600];
    assert_eq!(inflate_into(&compressed, &mut slack).unwrap(), data.len());
    assert_eq!(&slack[..data.len()], &data[..]);
}

#[test]
fn test_inflate_into_overflow() {
    let data = pattern_text(512);
    let compressed = deflate(&data);
    let mut buf = vec![0u8; 100];
    assert!(matches!(
        inflate_into(&compressed, &mut buf),
        Err(Error::OutputOverflow { .. })
    ));
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_reserved_block_type() {
    assert_eq!(inflate(&[0x07]), Err(Error::InvalidBlockType { at: 0 }));
}

#[test]
fn test_non_final_block() {
    assert_eq!(inflate(&[0x02]), Err(Error::NonFinalBlock { at: 0 }));
}

#[test]
fn test_truncated_streams() {
    assert!(matches!(inflate(&[]), Err(Error::TruncatedInput { .. })));

    let compressed = deflate(&pattern_text(300));
    for cut in [1, compressed.len() / 2, compressed.len() - 1] {
        assert!(
            inflate(&compressed[..cut]).is_err(),
            "cut at {} must not decode",
            cut
        );
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4000)) {
        let compressed = deflate(&data);
        let restored = inflate(&compressed).unwrap();
        prop_assert_eq!(restored, data);
    }

    #[test]
    fn prop_flate2_reads_our_output(data in proptest::collection::vec(any::<u8>(), 0..2000)) {
        let compressed = deflate(&data);
        prop_assert_eq!(flate2_inflate(&compressed), data);
    }

    #[test]
    fn prop_we_read_flate2_output(data in proptest::collection::vec(any::<u8>(), 0..2000)) {
        let compressed = flate2_deflate(&data, Compression::default());
        prop_assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_token_invariants(data in proptest::collection::vec(any::<u8>(), 0..3000)) {
        let tokens = Lz77Compressor::new().compress(&data);
        for token in &tokens {
            if let Token::Match { length, distance } = *token {
                prop_assert!((3..=32).contains(&length));
                prop_assert!((1..=4095).contains(&distance));
            }
        }
    }

    #[test]
    fn prop_decoder_does_not_panic(data in proptest::collection::vec(any::<u8>(), 0..500)) {
        // Arbitrary bytes must decode or fail cleanly, never panic.
        let _ = inflate(&data);
    }
}
