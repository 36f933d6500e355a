//! Lane-parallel LZ77 match search.
//!
//! The compressor processes [`LANES`] input positions per cycle against
//! [`NUM_DICTS`] hash-indexed dictionaries, mirroring a hardware
//! pipeline: every lane probes every dictionary in the same cycle, a
//! reduction picks the best match per lane, and a lazy sweep selects
//! the match whose end reaches furthest. Each lane owns one dictionary
//! for updates, which keeps the per-cycle write ports independent and
//! raises the effective associativity of the probe.

/// Input positions processed per cycle. Must equal [`NUM_DICTS`]; each
/// lane updates its own dictionary. Raising it widens the probe/update
/// fan-out per cycle.
pub const LANES: usize = 4;

/// Number of parallel hash dictionaries, one per lane.
pub const NUM_DICTS: usize = 4;

/// Maximum match length. Bounded well below DEFLATE's 258 so a match
/// always fits the lookahead window.
pub const MAX_MATCH_LENGTH: usize = 32;

/// Minimum match length worth encoding.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Matches at or beyond this distance are dropped in favor of literals.
pub const MAX_DISTANCE: usize = 4096;

/// Slots per dictionary. Must be a power of two; it sets the hash mask
/// and scales dictionary memory.
pub const HASH_SIZE: usize = 2048;

/// Sliding buffer: one cycle of lanes plus the full lookahead.
const WINDOW_SIZE: usize = LANES + MAX_MATCH_LENGTH;

// Lane i writes its snapshot into dictionary i.
const _: () = assert!(LANES == NUM_DICTS);

/// LZ77 token representing either a literal or a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Uncompressed byte.
    Literal(u8),
    /// Back-reference match (length, distance).
    Match {
        /// Match length (3-32 as emitted; up to 258 accepted on decode).
        length: u16,
        /// Backward distance to the match (1-4095 as emitted).
        distance: u16,
    },
}

/// One dictionary slot: a snapshot of the window at insertion time plus
/// the absolute position the snapshot started at.
#[derive(Debug, Clone, Copy)]
struct DictEntry {
    start: usize,
    len: u8,
    bytes: [u8; MAX_MATCH_LENGTH],
}

/// Hash of the 4 bytes at window position `i`.
#[inline]
fn hash4(window: &[u8; WINDOW_SIZE], i: usize) -> usize {
    let h = ((window[i] as usize) << 3)
        ^ ((window[i + 1] as usize) << 2)
        ^ ((window[i + 2] as usize) << 1)
        ^ (window[i + 3] as usize);
    h & (HASH_SIZE - 1)
}

/// Lane-parallel LZ77 compressor.
pub struct Lz77Compressor {
    dicts: Vec<Vec<Option<DictEntry>>>,
    window: [u8; WINDOW_SIZE],
}

impl Lz77Compressor {
    /// Create a new compressor with empty dictionaries.
    pub fn new() -> Self {
        Self {
            dicts: vec![vec![None; HASH_SIZE]; NUM_DICTS],
            window: [0; WINDOW_SIZE],
        }
    }

    /// Compress data and return LZ77 tokens.
    pub fn compress(&mut self, data: &[u8]) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(data.len());
        self.compress_into(data, &mut tokens);
        tokens
    }

    /// Compress data into a provided token buffer, reusing allocations.
    pub fn compress_into(&mut self, data: &[u8], tokens: &mut Vec<Token>) {
        tokens.clear();
        if data.is_empty() {
            return;
        }
        tokens.reserve(data.len());

        for dict in &mut self.dicts {
            dict.fill(None);
        }
        self.window = [0; WINDOW_SIZE];

        // Prime the lookahead; the first shift moves it into lane range.
        let take = data.len().min(MAX_MATCH_LENGTH);
        self.window[LANES..LANES + take].copy_from_slice(&data[..take]);

        // Window-relative position of the first byte not yet covered by
        // an emitted literal or match. A long match can push it past the
        // lane range, making later cycles skip the covered lanes.
        let mut first_valid = LANES;

        let mut base = 0;
        while base < data.len() {
            // 1. Shift the window and load the next lane's worth of input.
            self.window.copy_within(LANES.., 0);
            for j in 0..LANES {
                let src = base + MAX_MATCH_LENGTH + j;
                self.window[MAX_MATCH_LENGTH + j] =
                    if src < data.len() { data[src] } else { 0 };
            }
            first_valid -= LANES;

            // 2. Probe every dictionary from every lane and reduce to
            // the best match per lane. Earliest dictionary wins ties.
            let mut best_len = [0usize; LANES];
            let mut best_start = [0usize; LANES];
            for i in 0..LANES {
                let pos = base + i;
                if pos + MIN_MATCH_LENGTH > data.len() {
                    continue;
                }
                let remaining = data.len() - pos;
                let hash = hash4(&self.window, i);
                for dict in &self.dicts {
                    if let Some(entry) = &dict[hash] {
                        let limit = remaining.min(entry.len as usize);
                        let mut len = 0;
                        while len < limit && self.window[i + len] == entry.bytes[len] {
                            len += 1;
                        }
                        if len > best_len[i] {
                            best_len[i] = len;
                            best_start[i] = entry.start;
                        }
                    }
                }
            }

            // 3. Lazy sweep: a later lane is adopted only if its match
            // ends strictly beyond every earlier candidate.
            let mut chosen: Option<(usize, usize, usize)> = None;
            let mut reach = first_valid;
            for i in first_valid..LANES {
                if best_len[i] >= MIN_MATCH_LENGTH && i + best_len[i] > reach {
                    reach = i + best_len[i];
                    let offset = (base + i) - best_start[i];
                    chosen = Some((i, best_len[i], offset));
                }
            }

            // 4. Emit. A match past MAX_DISTANCE degrades the whole
            // cycle to literals.
            match chosen {
                Some((lane, len, offset)) if offset < MAX_DISTANCE => {
                    while first_valid < lane {
                        tokens.push(Token::Literal(self.window[first_valid]));
                        first_valid += 1;
                    }
                    tokens.push(Token::Match {
                        length: len as u16,
                        distance: offset as u16,
                    });
                    first_valid = lane + len;
                    while first_valid < LANES {
                        if base + first_valid < data.len() {
                            tokens.push(Token::Literal(self.window[first_valid]));
                        }
                        first_valid += 1;
                    }
                }
                _ => {
                    while first_valid < LANES {
                        if base + first_valid < data.len() {
                            tokens.push(Token::Literal(self.window[first_valid]));
                        }
                        first_valid += 1;
                    }
                }
            }

            // 5. Each lane overwrites its own dictionary's slot with the
            // window snapshot starting at that lane.
            for (i, dict) in self.dicts.iter_mut().enumerate() {
                let pos = base + i;
                if pos >= data.len() {
                    break;
                }
                let avail = (data.len() - pos).min(MAX_MATCH_LENGTH);
                let hash = hash4(&self.window, i);
                let mut bytes = [0u8; MAX_MATCH_LENGTH];
                bytes[..avail].copy_from_slice(&self.window[i..i + avail]);
                dict[hash] = Some(DictEntry {
                    start: pos,
                    len: avail as u8,
                    bytes,
                });
            }

            base += LANES;
        }
    }
}

impl Default for Lz77Compressor {
    fn default() -> Self {
        Self::new()
    }
}
