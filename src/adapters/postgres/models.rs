//! Row mapping between PostgreSQL and domain types

use crate::domain::ids::GenerationCode;
use crate::domain::{Generation, Result, Sheet, SheetStatus, StoreError};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;

fn column<'a, T>(row: &'a Row, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| StoreError::QueryFailed(format!("Failed to read column {name}: {e}")).into())
}

/// Map a `generations` row to the domain type
pub fn generation_from_row(row: &Row) -> Result<Generation> {
    let code: String = column(row, "code")?;
    let code = GenerationCode::new(code)
        .map_err(|e| StoreError::QueryFailed(format!("Stored generation code invalid: {e}")))?;

    Ok(Generation {
        id: column(row, "id")?,
        code,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
        is_active: column(row, "is_active")?,
    })
}

/// Map a `sheets` row to the domain type
pub fn sheet_from_row(row: &Row) -> Result<Sheet> {
    let code: String = column(row, "generation_code")?;
    let generation_code = GenerationCode::new(code)
        .map_err(|e| StoreError::QueryFailed(format!("Stored generation code invalid: {e}")))?;

    let status: String = column(row, "status")?;
    let status: SheetStatus = status
        .parse()
        .map_err(|e: String| StoreError::QueryFailed(e))?;

    let sheet_number: i32 = column(row, "sheet_number")?;

    Ok(Sheet {
        id: column(row, "id")?,
        generation_id: column(row, "generation_id")?,
        generation_code,
        sheet_number: sheet_number as u32,
        status,
        sold_at: column::<Option<DateTime<Utc>>>(row, "sold_at")?,
        payload_json: column(row, "payload_json")?,
        fingerprint: column(row, "fingerprint")?,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
    })
}
