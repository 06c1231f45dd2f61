//! Core business logic for Tombola.
//!
//! This module contains the generation and export engine.
//!
//! # Modules
//!
//! - [`content`] - Sheet content generation and code allocation
//! - [`populate`] - Sheet population and the generation lifecycle
//! - [`export`] - Background export jobs and their registry
//! - [`archive`] - Incremental ZIP building
//!
//! # Workflow
//!
//! The typical batch workflow:
//!
//! 1. **Ensure generation**: load the active generation, or create one with
//!    a collision-checked code
//! 2. **Populate**: generate sheet content and insert under the next free
//!    number, retrying uniqueness conflicts in place
//! 3. **Export**: start a background job that renders every sheet and
//!    streams the documents into one ZIP archive
//! 4. **Poll**: read the job's status/progress until `Done`, then fetch the
//!    archive from disk
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tombola::adapters::store::MemoryStore;
//! use tombola::core::content::RandomContentGenerator;
//! use tombola::core::populate::{GenerationManager, SheetPopulator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let manager = GenerationManager::new(store.clone());
//! let populator = SheetPopulator::new(store, Arc::new(RandomContentGenerator::new()));
//!
//! let generation = manager.ensure_active_generation().await?;
//! let outcome = populator.populate(&generation, 1000).await?;
//!
//! println!("Created: {}", outcome.created);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod content;
pub mod export;
pub mod populate;
