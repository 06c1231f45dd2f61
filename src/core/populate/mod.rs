//! Sheet population
//!
//! This module drives the content generator in a loop against the store,
//! enforcing per-generation numbering and global content uniqueness, and
//! owns the generation lifecycle (create/activate/regenerate).

use crate::adapters::store::traits::SheetStore;
use crate::core::content::code::allocate_code;
use crate::core::content::ContentGenerator;
use crate::domain::sheet::MAX_SHEET_NUMBER;
use crate::domain::{Generation, NewGeneration, NewSheet, Result, TombolaError};
use chrono::Utc;
use std::sync::Arc;

/// Attempts to find an unused generation code before giving up
///
/// With 32^10 possible codes, exhausting this bound means something is
/// wrong with the deployment, not bad luck.
pub const MAX_CODE_ATTEMPTS: u32 = 30;

/// Consecutive insert conflicts tolerated on a single sheet number
///
/// The content space makes real collisions vanishingly rare; hitting this
/// cap indicates a broken content generator rather than contention.
pub const MAX_CONFLICT_RETRIES: u32 = 1000;

/// Result of one populate call
///
/// A shortfall (`created < requested`) is not an error: population stops
/// silently at the sheet number ceiling and the caller decides what a
/// partial fill means.
#[derive(Debug, Clone)]
pub struct PopulateOutcome {
    /// Number of sheets the caller asked for
    pub requested: u32,

    /// Number of sheets committed by this call
    pub created: u32,

    /// Total sheets the generation holds after this call
    pub final_count: u64,
}

impl PopulateOutcome {
    /// Whether the call committed fewer sheets than requested
    pub fn is_short(&self) -> bool {
        self.created < self.requested
    }
}

/// Populates a generation with globally-unique sheets
///
/// Idempotent and resumable: numbering continues one past the highest sheet
/// number already stored. Safe under concurrent populators because
/// uniqueness is enforced by the store, not by in-process coordination.
pub struct SheetPopulator {
    store: Arc<dyn SheetStore>,
    generator: Arc<dyn ContentGenerator>,
}

impl SheetPopulator {
    /// Create a new populator
    pub fn new(store: Arc<dyn SheetStore>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self { store, generator }
    }

    /// Populate `generation` with up to `target_count` new sheets
    ///
    /// Stops when `target_count` sheets have been committed or the next
    /// sheet number would exceed 1000, whichever comes first. On a
    /// uniqueness conflict the same position is retried with freshly
    /// generated content; a number is never abandoned, so the generation's
    /// numbering stays gap-free.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails non-transiently, or when one
    /// position keeps conflicting past [`MAX_CONFLICT_RETRIES`].
    pub async fn populate(
        &self,
        generation: &Generation,
        target_count: u32,
    ) -> Result<PopulateOutcome> {
        let start = self.store.max_sheet_number(generation.id).await?;
        let mut sheet_number = start + 1;
        let mut created = 0u32;
        let mut conflicts = 0u32;

        tracing::info!(
            generation_code = %generation.code,
            start_number = sheet_number,
            target_count,
            "Populating generation"
        );

        while created < target_count && sheet_number <= MAX_SHEET_NUMBER {
            let content = self.generator.generate();

            let sheet = NewSheet {
                generation_id: generation.id,
                generation_code: generation.code.clone(),
                sheet_number,
                payload_json: content.payload_json,
                fingerprint: content.fingerprint,
                created_at: Utc::now(),
            };

            match self.store.insert_sheet(sheet).await {
                Ok(_) => {
                    created += 1;
                    sheet_number += 1;
                    conflicts = 0;
                }
                Err(e) if e.is_conflict() => {
                    conflicts += 1;
                    if conflicts > MAX_CONFLICT_RETRIES {
                        return Err(TombolaError::Populate(format!(
                            "Sheet number {sheet_number} conflicted {conflicts} times in a row; \
                             giving up"
                        )));
                    }

                    tracing::debug!(
                        generation_code = %generation.code,
                        sheet_number,
                        conflicts,
                        "Insert conflict, retrying position with fresh content"
                    );

                    // A racing populator may have claimed this number (and
                    // everything up to the new maximum). Re-resolve the next
                    // free position; for a plain fingerprint collision this
                    // is the same number again.
                    let max = self.store.max_sheet_number(generation.id).await?;
                    sheet_number = sheet_number.max(max + 1);
                }
                Err(e) => return Err(e),
            }
        }

        let final_count = self.store.sheet_count(generation.id).await?;

        let outcome = PopulateOutcome {
            requested: target_count,
            created,
            final_count,
        };

        if outcome.is_short() {
            tracing::warn!(
                generation_code = %generation.code,
                created = outcome.created,
                requested = outcome.requested,
                "Population stopped at the sheet number ceiling"
            );
        } else {
            tracing::info!(
                generation_code = %generation.code,
                created = outcome.created,
                final_count = outcome.final_count,
                "Population complete"
            );
        }

        Ok(outcome)
    }
}

/// Owns the generation lifecycle
///
/// Creation happens on demand when no generation is active, or on explicit
/// regeneration. Activating a new generation always clears the flag on all
/// others first, so at most one is active at any time.
pub struct GenerationManager {
    store: Arc<dyn SheetStore>,
}

impl GenerationManager {
    /// Create a new manager
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Load the active generation, if any
    pub async fn active_generation(&self) -> Result<Option<Generation>> {
        self.store.active_generation().await
    }

    /// Load the active generation, creating one when none exists
    pub async fn ensure_active_generation(&self) -> Result<Generation> {
        if let Some(generation) = self.store.active_generation().await? {
            return Ok(generation);
        }
        self.create_active_generation().await
    }

    /// Create and activate a new generation with a collision-checked code
    ///
    /// # Errors
    ///
    /// Fails with [`TombolaError::CapacityExhausted`] when no unused code is
    /// found within [`MAX_CODE_ATTEMPTS`] attempts.
    pub async fn create_active_generation(&self) -> Result<Generation> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = allocate_code();

            if self.store.generation_code_exists(&code).await? {
                tracing::warn!(attempt, "Generation code already taken, drawing another");
                continue;
            }

            self.store.deactivate_all_generations().await?;

            match self
                .store
                .insert_generation(NewGeneration::active(code.clone()))
                .await
            {
                Ok(generation) => {
                    tracing::info!(
                        generation_code = %generation.code,
                        "Created new active generation"
                    );
                    return Ok(generation);
                }
                // Lost a race on the code between the existence check and
                // the insert; draw another.
                Err(e) if e.is_conflict() => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TombolaError::CapacityExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Discard all sheets and start over with a fresh active generation
    ///
    /// Deactivates every generation, deletes every sheet, creates a new
    /// active generation and populates it with `target_count` sheets.
    pub async fn regenerate(
        &self,
        populator: &SheetPopulator,
        target_count: u32,
    ) -> Result<(Generation, PopulateOutcome)> {
        tracing::info!(target_count, "Regenerating: discarding all sheets");

        self.store.deactivate_all_generations().await?;
        let removed = self.store.delete_all_sheets().await?;
        tracing::info!(removed, "Deleted sheets of previous generations");

        let generation = self.create_active_generation().await?;
        let outcome = populator.populate(&generation, target_count).await?;

        Ok((generation, outcome))
    }
}
