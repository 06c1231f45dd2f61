//! Store abstraction traits
//!
//! This module defines the trait that persistent store backends must
//! implement to work with the generation and export engine.

use crate::domain::ids::GenerationCode;
use crate::domain::{Generation, NewGeneration, NewSheet, Result, Sheet, SheetStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistent store for generations and sheets
///
/// Uniqueness is enforced here, not in process memory: `insert_sheet` must
/// fail with [`StoreError::Conflict`](crate::domain::StoreError::Conflict)
/// when either the fingerprint or the (generation, sheet number) pair is
/// already taken, even when two writers race. Backends are expected to apply
/// their own retry policy for transient failures before surfacing an error.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Ensure the schema exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or accessed.
    async fn ensure_schema(&self) -> Result<()>;

    /// Load the active generation, if any
    async fn active_generation(&self) -> Result<Option<Generation>>;

    /// Load a generation by its code
    async fn find_generation_by_code(&self, code: &GenerationCode) -> Result<Option<Generation>>;

    /// Check whether a generation code is already taken
    async fn generation_code_exists(&self, code: &GenerationCode) -> Result<bool>;

    /// Insert a generation and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Fails with a conflict error when the code is already taken.
    async fn insert_generation(&self, generation: NewGeneration) -> Result<Generation>;

    /// Clear the active flag on every generation
    ///
    /// Returns the number of generations deactivated.
    async fn deactivate_all_generations(&self) -> Result<u64>;

    /// Delete every sheet of every generation
    ///
    /// Used only by explicit regeneration. Returns the number of sheets
    /// removed.
    async fn delete_all_sheets(&self) -> Result<u64>;

    /// Insert a sheet and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Fails with a conflict error when the fingerprint is taken anywhere in
    /// the store, or the sheet number is taken within the generation.
    async fn insert_sheet(&self, sheet: NewSheet) -> Result<Sheet>;

    /// Count the sheets of a generation
    async fn sheet_count(&self, generation_id: i64) -> Result<u64>;

    /// Count the sheets of a generation in a given status
    async fn sheet_count_by_status(&self, generation_id: i64, status: SheetStatus) -> Result<u64>;

    /// Highest sheet number stored for a generation, 0 if it has none
    async fn max_sheet_number(&self, generation_id: i64) -> Result<u32>;

    /// All sheets of a generation, ordered by sheet number
    async fn sheets_for_generation(&self, generation_id: i64) -> Result<Vec<Sheet>>;

    /// Mark every `Unassigned` sheet of a generation `Sold` in one update
    ///
    /// All affected sheets receive the same `sold_at` timestamp. Returns the
    /// number of sheets flipped.
    async fn mark_unassigned_sold(&self, generation_id: i64, sold_at: DateTime<Utc>)
        -> Result<u64>;
}
