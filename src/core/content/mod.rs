//! Sheet content generation
//!
//! This module produces one sheet's structured payload (a fixed-size
//! collection of cards, each a 5x5 grid of unique numbers drawn from
//! disjoint ranges) and its content fingerprint.

pub mod code;

use crate::domain::payload::{Card, SheetPayload, CARDS_PER_SHEET, COLUMN_RANGES, GRID_SIZE};
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// One generated sheet's content
///
/// `payload_json` is the exact serialized form the fingerprint was computed
/// over; it must be persisted byte-for-byte.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    /// Structured payload
    pub payload: SheetPayload,

    /// Compact serialization of `payload`
    pub payload_json: String,

    /// Lowercase-hex SHA-256 of `payload_json`
    pub fingerprint: String,
}

/// Produces sheet content
///
/// The trait is the seam the populator is tested through: production code
/// uses [`RandomContentGenerator`], tests can inject a generator that
/// deliberately repeats payloads to exercise the conflict-retry path.
pub trait ContentGenerator: Send + Sync {
    /// Generate one sheet's payload and fingerprint
    ///
    /// Always succeeds; content generation has no error conditions and no
    /// side effects.
    fn generate(&self) -> GeneratedContent;
}

/// Production generator backed by the operating system CSPRNG
///
/// Every value is sampled uniformly without replacement from its column's
/// sub-range using `OsRng`. A statistically biased PRNG is not acceptable
/// here: fingerprint uniqueness rests on the content's entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomContentGenerator;

impl RandomContentGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    fn generate_card(&self) -> Card {
        let mut columns = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (col, &(min, max)) in COLUMN_RANGES.iter().enumerate() {
            columns[col] = pick_unique_sorted(min, max);
        }

        // Transpose: columns were sampled per band, cells are stored row-major.
        let mut grid = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = columns[col][row];
            }
        }
        Card { grid }
    }
}

impl ContentGenerator for RandomContentGenerator {
    fn generate(&self) -> GeneratedContent {
        let cards = (0..CARDS_PER_SHEET).map(|_| self.generate_card()).collect();
        let payload = SheetPayload { cards };

        let payload_json =
            serde_json::to_string(&payload).expect("sheet payload serialization cannot fail");
        let fingerprint = fingerprint_bytes(payload_json.as_bytes());

        GeneratedContent {
            payload,
            payload_json,
            fingerprint,
        }
    }
}

/// Draw `GRID_SIZE` distinct values from `min..=max`, ascending
fn pick_unique_sorted(min: u8, max: u8) -> [u8; GRID_SIZE] {
    let mut seen = HashSet::with_capacity(GRID_SIZE);
    while seen.len() < GRID_SIZE {
        let n: u8 = OsRng.gen_range(min..=max);
        seen.insert(n);
    }

    let mut values: Vec<u8> = seen.into_iter().collect();
    values.sort_unstable();

    let mut out = [0u8; GRID_SIZE];
    out.copy_from_slice(&values);
    out
}

/// Calculate the SHA-256 fingerprint of raw bytes
///
/// # Returns
///
/// Returns a lowercase hex-encoded SHA-256 string (64 characters).
pub fn fingerprint_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    format!("{digest:x}")
}
