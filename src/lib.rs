//! # Tombola - Sheet Batch Generation & Export Engine
//!
//! Tombola generates batches of globally-unique randomized bingo sheets and
//! exports them as rendered documents streamed into a single ZIP archive.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Generating** sheet content with collision-safe numbering and
//!   cryptographic fingerprinting
//! - **Populating** a persistent store idempotently, resuming from the
//!   highest stored sheet number
//! - **Exporting** whole generations through pollable background jobs that
//!   stream one document per sheet into an archive on disk
//!
//! ## Architecture
//!
//! Tombola follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (content, populate, export, archive)
//! - [`adapters`] - Store backends (PostgreSQL, in-memory)
//! - [`render`] - Sheet document rendering
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tombola::adapters::store::MemoryStore;
//! use tombola::core::content::RandomContentGenerator;
//! use tombola::core::populate::{GenerationManager, SheetPopulator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let manager = GenerationManager::new(store.clone());
//!     let populator =
//!         SheetPopulator::new(store.clone(), Arc::new(RandomContentGenerator::new()));
//!
//!     let generation = manager.ensure_active_generation().await?;
//!     let outcome = populator.populate(&generation, 1000).await?;
//!
//!     println!("Created {} sheets", outcome.created);
//!     Ok(())
//! }
//! ```
//!
//! ## Uniqueness Invariants
//!
//! Two uniqueness rules hold at all times, enforced by the store rather
//! than in process memory:
//!
//! - a sheet's content fingerprint (SHA-256 of its serialized payload) is
//!   unique across *all* generations
//! - (generation, sheet number) pairs are unique, with numbers in 1..=1000
//!
//! The populator treats uniqueness conflicts as expected events: it
//! regenerates content and retries the same position, so numbering stays
//! gap-free even under concurrent writers.
//!
//! ## Export Jobs
//!
//! Export runs as a background job with a visible state machine
//! (`Pending -> Running -> Done | Error`):
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tombola::core::export::ExportJobManager;
//!
//! # async fn example(manager: Arc<ExportJobManager>) {
//! let code = "AB23CD45EF".parse().unwrap();
//! let job_id = manager.start_job(code, true);
//!
//! // Poll from anywhere; reads never block on the worker
//! if let Some(view) = manager.status(&job_id) {
//!     println!("{}: {}% - {}", view.status, view.progress, view.message);
//! }
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Tombola uses the [`domain::TombolaError`] type for all errors:
//!
//! ```rust,no_run
//! use tombola::domain::TombolaError;
//!
//! fn example() -> Result<(), TombolaError> {
//!     let config = tombola::config::load_config("tombola.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod render;
