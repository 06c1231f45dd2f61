//! In-memory store backend
//!
//! Backend for tests and single-process demo runs. Enforces the same
//! uniqueness rules as the PostgreSQL schema so the population engine
//! behaves identically against either backend.

use crate::adapters::store::traits::SheetStore;
use crate::domain::ids::GenerationCode;
use crate::domain::{
    Generation, NewGeneration, NewSheet, Result, Sheet, SheetStatus, StoreError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    generations: Vec<Generation>,
    sheets: Vec<Sheet>,
    next_generation_id: i64,
    next_sheet_id: i64,
}

/// In-memory implementation of [`SheetStore`]
///
/// A single mutex over both tables keeps insert-and-check atomic, which is
/// what makes the conflict semantics match a database unique index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn active_generation(&self) -> Result<Option<Generation>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .generations
            .iter()
            .filter(|g| g.is_active)
            .max_by_key(|g| g.id)
            .cloned())
    }

    async fn find_generation_by_code(&self, code: &GenerationCode) -> Result<Option<Generation>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .generations
            .iter()
            .find(|g| &g.code == code)
            .cloned())
    }

    async fn generation_code_exists(&self, code: &GenerationCode) -> Result<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.generations.iter().any(|g| &g.code == code))
    }

    async fn insert_generation(&self, generation: NewGeneration) -> Result<Generation> {
        let mut tables = self.tables.lock().await;
        if tables.generations.iter().any(|g| g.code == generation.code) {
            return Err(StoreError::Conflict(format!(
                "generation code {} already exists",
                generation.code
            ))
            .into());
        }

        tables.next_generation_id += 1;
        let stored = Generation {
            id: tables.next_generation_id,
            code: generation.code,
            created_at: generation.created_at,
            is_active: generation.is_active,
        };
        tables.generations.push(stored.clone());
        Ok(stored)
    }

    async fn deactivate_all_generations(&self) -> Result<u64> {
        let mut tables = self.tables.lock().await;
        let mut changed = 0;
        for generation in tables.generations.iter_mut() {
            if generation.is_active {
                generation.is_active = false;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete_all_sheets(&self) -> Result<u64> {
        let mut tables = self.tables.lock().await;
        let removed = tables.sheets.len() as u64;
        tables.sheets.clear();
        Ok(removed)
    }

    async fn insert_sheet(&self, sheet: NewSheet) -> Result<Sheet> {
        let mut tables = self.tables.lock().await;

        // Fingerprint uniqueness is global, across all generations.
        if tables
            .sheets
            .iter()
            .any(|s| s.fingerprint == sheet.fingerprint)
        {
            return Err(StoreError::Conflict(format!(
                "fingerprint {} already exists",
                sheet.fingerprint
            ))
            .into());
        }

        if tables.sheets.iter().any(|s| {
            s.generation_id == sheet.generation_id && s.sheet_number == sheet.sheet_number
        }) {
            return Err(StoreError::Conflict(format!(
                "sheet number {} already exists in generation {}",
                sheet.sheet_number, sheet.generation_id
            ))
            .into());
        }

        tables.next_sheet_id += 1;
        let stored = Sheet {
            id: tables.next_sheet_id,
            generation_id: sheet.generation_id,
            generation_code: sheet.generation_code,
            sheet_number: sheet.sheet_number,
            status: SheetStatus::Unassigned,
            sold_at: None,
            payload_json: sheet.payload_json,
            fingerprint: sheet.fingerprint,
            created_at: sheet.created_at,
        };
        tables.sheets.push(stored.clone());
        Ok(stored)
    }

    async fn sheet_count(&self, generation_id: i64) -> Result<u64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sheets
            .iter()
            .filter(|s| s.generation_id == generation_id)
            .count() as u64)
    }

    async fn sheet_count_by_status(
        &self,
        generation_id: i64,
        status: SheetStatus,
    ) -> Result<u64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sheets
            .iter()
            .filter(|s| s.generation_id == generation_id && s.status == status)
            .count() as u64)
    }

    async fn max_sheet_number(&self, generation_id: i64) -> Result<u32> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sheets
            .iter()
            .filter(|s| s.generation_id == generation_id)
            .map(|s| s.sheet_number)
            .max()
            .unwrap_or(0))
    }

    async fn sheets_for_generation(&self, generation_id: i64) -> Result<Vec<Sheet>> {
        let tables = self.tables.lock().await;
        let mut sheets: Vec<Sheet> = tables
            .sheets
            .iter()
            .filter(|s| s.generation_id == generation_id)
            .cloned()
            .collect();
        sheets.sort_by_key(|s| s.sheet_number);
        Ok(sheets)
    }

    async fn mark_unassigned_sold(
        &self,
        generation_id: i64,
        sold_at: DateTime<Utc>,
    ) -> Result<u64> {
        let mut tables = self.tables.lock().await;
        let mut changed = 0;
        for sheet in tables
            .sheets
            .iter_mut()
            .filter(|s| s.generation_id == generation_id)
        {
            if sheet.mark_sold(sold_at) {
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::GenerationCode;
    use std::str::FromStr;

    fn new_sheet(generation_id: i64, number: u32, fingerprint: &str) -> NewSheet {
        NewSheet {
            generation_id,
            generation_code: GenerationCode::from_str("AB23CD45EF").unwrap(),
            sheet_number: number,
            payload_json: format!("{{\"n\":{number}}}"),
            fingerprint: fingerprint.to_string(),
            created_at: Utc::now(),
        }
    }

    async fn store_with_generation() -> (MemoryStore, Generation) {
        let store = MemoryStore::new();
        let generation = store
            .insert_generation(NewGeneration::active(
                GenerationCode::from_str("AB23CD45EF").unwrap(),
            ))
            .await
            .unwrap();
        (store, generation)
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let (store, _) = store_with_generation().await;
        let result = store
            .insert_generation(NewGeneration::active(
                GenerationCode::from_str("AB23CD45EF").unwrap(),
            ))
            .await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_fingerprint_conflicts_across_generations() {
        let (store, generation) = store_with_generation().await;
        let other = store
            .insert_generation(NewGeneration::active(
                GenerationCode::from_str("ZZ23CD45EF").unwrap(),
            ))
            .await
            .unwrap();

        store
            .insert_sheet(new_sheet(generation.id, 1, "fp-1"))
            .await
            .unwrap();
        let result = store.insert_sheet(new_sheet(other.id, 1, "fp-1")).await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_sheet_number_conflicts() {
        let (store, generation) = store_with_generation().await;
        store
            .insert_sheet(new_sheet(generation.id, 1, "fp-1"))
            .await
            .unwrap();
        let result = store.insert_sheet(new_sheet(generation.id, 1, "fp-2")).await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_max_sheet_number_defaults_to_zero() {
        let (store, generation) = store_with_generation().await;
        assert_eq!(store.max_sheet_number(generation.id).await.unwrap(), 0);

        store
            .insert_sheet(new_sheet(generation.id, 7, "fp-7"))
            .await
            .unwrap();
        assert_eq!(store.max_sheet_number(generation.id).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_mark_unassigned_sold_stamps_one_timestamp() {
        let (store, generation) = store_with_generation().await;
        for n in 1..=3 {
            store
                .insert_sheet(new_sheet(generation.id, n, &format!("fp-{n}")))
                .await
                .unwrap();
        }

        let sold_at = Utc::now();
        let changed = store
            .mark_unassigned_sold(generation.id, sold_at)
            .await
            .unwrap();
        assert_eq!(changed, 3);

        let sheets = store.sheets_for_generation(generation.id).await.unwrap();
        for sheet in &sheets {
            assert_eq!(sheet.status, SheetStatus::Sold);
            assert_eq!(sheet.sold_at, Some(sold_at));
        }

        // Idempotent: nothing left to flip
        let changed = store
            .mark_unassigned_sold(generation.id, Utc::now())
            .await
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[tokio::test]
    async fn test_sheets_ordered_by_number() {
        let (store, generation) = store_with_generation().await;
        for n in [3u32, 1, 2] {
            store
                .insert_sheet(new_sheet(generation.id, n, &format!("fp-{n}")))
                .await
                .unwrap();
        }
        let sheets = store.sheets_for_generation(generation.id).await.unwrap();
        let numbers: Vec<u32> = sheets.iter().map(|s| s.sheet_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_deactivate_all_generations() {
        let (store, _) = store_with_generation().await;
        assert_eq!(store.deactivate_all_generations().await.unwrap(), 1);
        assert!(store.active_generation().await.unwrap().is_none());
    }
}
