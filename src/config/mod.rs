//! Configuration management for Tombola.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Tombola uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`TOMBOLA_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tombola::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tombola.toml")?;
//!
//! println!("Store backend: {:?}", config.store.backend);
//! println!("Export dir: {}", config.export.output_dir);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, GenerationConfig, LoggingConfig, PostgresConfig,
    StoreBackend, StoreConfig, TombolaConfig,
};
