//! Sheet payload model
//!
//! This module defines the structured content of a sheet: a fixed number of
//! cards, each a 5x5 grid of numbers where every column draws from its own
//! sub-range of 1..90.

use serde::{Deserialize, Serialize};

/// Number of cards on one sheet
pub const CARDS_PER_SHEET: usize = 4;

/// Card grid dimension (rows and columns)
pub const GRID_SIZE: usize = 5;

/// Inclusive value ranges per column, five equal-width bands partitioning
/// 1..90
pub const COLUMN_RANGES: [(u8, u8); GRID_SIZE] = [(1, 18), (19, 36), (37, 54), (55, 72), (73, 90)];

/// Content of one sheet: a fixed-size collection of cards
///
/// The payload is serialized compactly with stable field order, so
/// byte-identical content always yields the same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPayload {
    /// The cards printed on this sheet, in position order
    pub cards: Vec<Card>,
}

/// One 5x5 card
///
/// `grid[row][col]` holds the number printed at that cell. Column `col`
/// contains five distinct ascending values from `COLUMN_RANGES[col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Row-major cell values
    pub grid: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Card {
    /// Returns the values of one column, top to bottom
    pub fn column(&self, col: usize) -> [u8; GRID_SIZE] {
        let mut out = [0u8; GRID_SIZE];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.grid[row][col];
        }
        out
    }

    /// Validates column ranges, uniqueness and ordering
    pub fn validate(&self) -> Result<(), String> {
        for col in 0..GRID_SIZE {
            let (min, max) = COLUMN_RANGES[col];
            let values = self.column(col);
            for value in values {
                if value < min || value > max {
                    return Err(format!(
                        "Column {col} value {value} outside range {min}..={max}"
                    ));
                }
            }
            for pair in values.windows(2) {
                if pair[1] <= pair[0] {
                    return Err(format!(
                        "Column {col} values must be strictly ascending, got {:?}",
                        values
                    ));
                }
            }
        }
        Ok(())
    }
}

impl SheetPayload {
    /// Validates the card count and every card's grid
    pub fn validate(&self) -> Result<(), String> {
        if self.cards.len() != CARDS_PER_SHEET {
            return Err(format!(
                "Sheet must carry exactly {} cards, got {}",
                CARDS_PER_SHEET,
                self.cards.len()
            ));
        }
        for (i, card) in self.cards.iter().enumerate() {
            card.validate().map_err(|e| format!("Card {i}: {e}"))?;
        }
        Ok(())
    }
}
