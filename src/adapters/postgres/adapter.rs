//! PostgreSQL adapter implementing the store trait
//!
//! This module provides the implementation of [`SheetStore`] backed by the
//! pooled PostgreSQL client. Uniqueness conflicts surface as
//! `StoreError::Conflict` via the client's error mapping, which is what the
//! population retry loop relies on.

use crate::adapters::postgres::client::PostgresClient;
use crate::adapters::postgres::models::{generation_from_row, sheet_from_row};
use crate::adapters::store::traits::SheetStore;
use crate::domain::ids::GenerationCode;
use crate::domain::{Generation, NewGeneration, NewSheet, Result, Sheet, SheetStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// PostgreSQL implementation of [`SheetStore`]
pub struct PostgresStore {
    client: Arc<PostgresClient>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgresClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgresClient> {
        &self.client
    }
}

#[async_trait]
impl SheetStore for PostgresStore {
    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn active_generation(&self) -> Result<Option<Generation>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, code, created_at, is_active
                 FROM generations
                 WHERE is_active
                 ORDER BY id DESC
                 LIMIT 1",
                &[],
            )
            .await?;

        row.as_ref().map(generation_from_row).transpose()
    }

    async fn find_generation_by_code(&self, code: &GenerationCode) -> Result<Option<Generation>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, code, created_at, is_active
                 FROM generations
                 WHERE code = $1",
                &[&code.as_str()],
            )
            .await?;

        row.as_ref().map(generation_from_row).transpose()
    }

    async fn generation_code_exists(&self, code: &GenerationCode) -> Result<bool> {
        let row = self
            .client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM generations WHERE code = $1)",
                &[&code.as_str()],
            )
            .await?;

        Ok(row.get::<_, bool>(0))
    }

    async fn insert_generation(&self, generation: NewGeneration) -> Result<Generation> {
        let row = self
            .client
            .query_one(
                "INSERT INTO generations (code, created_at, is_active)
                 VALUES ($1, $2, $3)
                 RETURNING id",
                &[
                    &generation.code.as_str(),
                    &generation.created_at,
                    &generation.is_active,
                ],
            )
            .await?;

        Ok(Generation {
            id: row.get(0),
            code: generation.code,
            created_at: generation.created_at,
            is_active: generation.is_active,
        })
    }

    async fn deactivate_all_generations(&self) -> Result<u64> {
        self.client
            .execute(
                "UPDATE generations SET is_active = FALSE WHERE is_active",
                &[],
            )
            .await
    }

    async fn delete_all_sheets(&self) -> Result<u64> {
        self.client.execute("DELETE FROM sheets", &[]).await
    }

    async fn insert_sheet(&self, sheet: NewSheet) -> Result<Sheet> {
        let sheet_number = sheet.sheet_number as i32;
        let row = self
            .client
            .query_one(
                "INSERT INTO sheets
                     (generation_id, generation_code, sheet_number, status,
                      payload_json, fingerprint, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
                &[
                    &sheet.generation_id,
                    &sheet.generation_code.as_str(),
                    &sheet_number,
                    &SheetStatus::Unassigned.as_str(),
                    &sheet.payload_json,
                    &sheet.fingerprint,
                    &sheet.created_at,
                ],
            )
            .await?;

        Ok(Sheet {
            id: row.get(0),
            generation_id: sheet.generation_id,
            generation_code: sheet.generation_code,
            sheet_number: sheet.sheet_number,
            status: SheetStatus::Unassigned,
            sold_at: None,
            payload_json: sheet.payload_json,
            fingerprint: sheet.fingerprint,
            created_at: sheet.created_at,
        })
    }

    async fn sheet_count(&self, generation_id: i64) -> Result<u64> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM sheets WHERE generation_id = $1",
                &[&generation_id],
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u64)
    }

    async fn sheet_count_by_status(
        &self,
        generation_id: i64,
        status: SheetStatus,
    ) -> Result<u64> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM sheets WHERE generation_id = $1 AND status = $2",
                &[&generation_id, &status.as_str()],
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u64)
    }

    async fn max_sheet_number(&self, generation_id: i64) -> Result<u32> {
        let row = self
            .client
            .query_one(
                "SELECT COALESCE(MAX(sheet_number), 0) FROM sheets WHERE generation_id = $1",
                &[&generation_id],
            )
            .await?;

        Ok(row.get::<_, i32>(0) as u32)
    }

    async fn sheets_for_generation(&self, generation_id: i64) -> Result<Vec<Sheet>> {
        let rows = self
            .client
            .query(
                "SELECT id, generation_id, generation_code, sheet_number, status,
                        sold_at, payload_json, fingerprint, created_at
                 FROM sheets
                 WHERE generation_id = $1
                 ORDER BY sheet_number",
                &[&generation_id],
            )
            .await?;

        rows.iter().map(sheet_from_row).collect()
    }

    async fn mark_unassigned_sold(
        &self,
        generation_id: i64,
        sold_at: DateTime<Utc>,
    ) -> Result<u64> {
        self.client
            .execute(
                "UPDATE sheets
                 SET status = $1, sold_at = $2
                 WHERE generation_id = $3 AND status = $4",
                &[
                    &SheetStatus::Sold.as_str(),
                    &sold_at,
                    &generation_id,
                    &SheetStatus::Unassigned.as_str(),
                ],
            )
            .await
    }
}
