//! Domain models and types for Tombola.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`GenerationCode`], [`JobId`])
//! - **Domain models** ([`Generation`], [`Sheet`], [`SheetPayload`])
//! - **Error types** ([`TombolaError`], [`StoreError`], [`JobError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Tombola uses the newtype pattern for identifiers to prevent mixing
//! different ID types:
//!
//! ```rust
//! use tombola::domain::{GenerationCode, JobId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let code = GenerationCode::new("AB23CD45EF")?;
//! let job_id = JobId::generate();
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: GenerationCode = job_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TombolaError>`]:
//!
//! ```rust
//! use tombola::domain::{Result, TombolaError};
//!
//! fn example() -> Result<()> {
//!     Err(TombolaError::Validation("bad input".to_string()))
//! }
//! ```

pub mod errors;
pub mod generation;
pub mod ids;
pub mod payload;
pub mod result;
pub mod sheet;

// Re-export commonly used types for convenience
pub use errors::{JobError, StoreError, TombolaError};
pub use generation::{Generation, NewGeneration};
pub use ids::{GenerationCode, JobId, CODE_ALPHABET, CODE_LENGTH};
pub use payload::{Card, SheetPayload, CARDS_PER_SHEET, COLUMN_RANGES, GRID_SIZE};
pub use result::Result;
pub use sheet::{NewSheet, Sheet, SheetStatus, MAX_SHEET_NUMBER};
