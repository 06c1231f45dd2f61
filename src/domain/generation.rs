//! Generation domain model

use super::ids::GenerationCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named batch of sheets sharing a code
///
/// At most one generation is active at any time; activating a new one clears
/// the flag on all others first. Immutable once created except for
/// `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    /// Store-assigned identifier
    pub id: i64,

    /// Unique 10-character code
    pub code: GenerationCode,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Whether this is the generation currently offered for sale
    pub is_active: bool,
}

/// A generation about to be inserted, before the store assigns its id
#[derive(Debug, Clone)]
pub struct NewGeneration {
    /// Unique 10-character code
    pub code: GenerationCode,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Whether the generation is inserted as the active one
    pub is_active: bool,
}

impl NewGeneration {
    /// Creates a new active generation record stamped with the current time
    pub fn active(code: GenerationCode) -> Self {
        Self {
            code,
            created_at: Utc::now(),
            is_active: true,
        }
    }
}
