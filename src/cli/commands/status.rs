//! Status command implementation
//!
//! Shows the active generation and its stock counts.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::domain::SheetStatus;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking generation status");

        println!("📊 Generation Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let store = match create_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if let Err(e) = store.ensure_schema().await {
            println!("❌ Failed to initialize store schema");
            println!("   Error: {e}");
            return Ok(5);
        }

        let generation = match store.active_generation().await {
            Ok(Some(g)) => g,
            Ok(None) => {
                println!("No active generation. Run `tombola generate` to create one.");
                return Ok(0);
            }
            Err(e) => {
                println!("❌ Failed to load the active generation");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        let total = store.sheet_count(generation.id).await?;
        let unassigned = store
            .sheet_count_by_status(generation.id, SheetStatus::Unassigned)
            .await?;
        let sold = store
            .sheet_count_by_status(generation.id, SheetStatus::Sold)
            .await?;

        println!("  Code:       {}", generation.code);
        println!("  Created:    {}", generation.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("  Sheets:     {total}");
        println!("  Unassigned: {unassigned}");
        println!("  Sold:       {sold}");

        if total > 0 && unassigned == 0 {
            println!();
            println!("✅ All sheets sold");
        }

        Ok(0)
    }
}
