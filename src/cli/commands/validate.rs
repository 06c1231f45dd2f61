//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tombola configuration file.

use crate::config::load_config;
use crate::config::schema::StoreBackend;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates on the way in
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Target Sheets: {}", config.generation.target_sheets);
        println!("  Export Dir: {}", config.export.output_dir);
        println!("  Retention: {}h", config.export.retention_hours);

        match config.store.backend {
            StoreBackend::Memory => {
                println!("  Store: memory (nothing survives a restart)");
            }
            StoreBackend::PostgreSQL => {
                println!("  Store: postgresql");
                if let Some(ref pg) = config.postgresql {
                    let safe = pg
                        .connection_string
                        .split('@')
                        .next_back()
                        .unwrap_or("<unset>");
                    println!("  PostgreSQL: ***@{safe}");
                    println!("  Pool Size: {}", pg.max_connections);
                }
            }
        }

        Ok(0)
    }
}
