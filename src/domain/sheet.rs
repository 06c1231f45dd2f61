//! Sheet domain model
//!
//! A sheet is one sellable unit: several randomized cards serialized into an
//! opaque payload, uniquely fingerprinted across all generations.

use super::ids::GenerationCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest sheet number a generation may hold
pub const MAX_SHEET_NUMBER: u32 = 1000;

/// Sale status of a sheet
///
/// Transitions are forward-only: `Unassigned -> Sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetStatus {
    /// In stock, not yet sold
    Unassigned,
    /// Sold; `sold_at` is stamped on the sheet
    Sold,
}

impl SheetStatus {
    /// Returns the status as the string persisted in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetStatus::Unassigned => "Unassigned",
            SheetStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for SheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SheetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unassigned" => Ok(SheetStatus::Unassigned),
            "Sold" => Ok(SheetStatus::Sold),
            other => Err(format!("Unknown sheet status: {other}")),
        }
    }
}

/// One numbered sheet belonging to a generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Store-assigned identifier
    pub id: i64,

    /// Owning generation
    pub generation_id: i64,

    /// Owning generation's code, denormalized for rendering and naming
    pub generation_code: GenerationCode,

    /// Sheet number, unique within the generation, 1..=1000
    pub sheet_number: u32,

    /// Sale status
    pub status: SheetStatus,

    /// Timestamp stamped when the sheet was sold
    pub sold_at: Option<DateTime<Utc>>,

    /// Serialized payload, preserved byte-for-byte as fingerprinted
    pub payload_json: String,

    /// Lowercase-hex SHA-256 of `payload_json`, globally unique
    pub fingerprint: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Sheet {
    /// Marks the sheet sold, stamping the given time
    ///
    /// Returns `false` when the sheet was already sold; the original
    /// timestamp is kept in that case.
    pub fn mark_sold(&mut self, at: DateTime<Utc>) -> bool {
        match self.status {
            SheetStatus::Unassigned => {
                self.status = SheetStatus::Sold;
                self.sold_at = Some(at);
                true
            }
            SheetStatus::Sold => false,
        }
    }
}

/// A sheet about to be inserted, before the store assigns its id
///
/// New sheets always start `Unassigned` with no sold timestamp.
#[derive(Debug, Clone)]
pub struct NewSheet {
    /// Owning generation
    pub generation_id: i64,

    /// Owning generation's code
    pub generation_code: GenerationCode,

    /// Sheet number to claim
    pub sheet_number: u32,

    /// Serialized payload
    pub payload_json: String,

    /// Lowercase-hex SHA-256 of `payload_json`
    pub fingerprint: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> Sheet {
        Sheet {
            id: 1,
            generation_id: 1,
            generation_code: "AB23CD45EF".parse().unwrap(),
            sheet_number: 1,
            status: SheetStatus::Unassigned,
            sold_at: None,
            payload_json: "{}".to_string(),
            fingerprint: "0".repeat(64),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            SheetStatus::from_str("Unassigned").unwrap(),
            SheetStatus::Unassigned
        );
        assert_eq!(SheetStatus::from_str("Sold").unwrap(), SheetStatus::Sold);
        assert!(SheetStatus::from_str("Returned").is_err());
    }

    #[test]
    fn test_mark_sold_is_forward_only() {
        let mut sheet = sample_sheet();
        let first = Utc::now();
        assert!(sheet.mark_sold(first));
        assert_eq!(sheet.status, SheetStatus::Sold);
        assert_eq!(sheet.sold_at, Some(first));

        // A second sale attempt keeps the original timestamp
        assert!(!sheet.mark_sold(Utc::now()));
        assert_eq!(sheet.sold_at, Some(first));
    }
}
