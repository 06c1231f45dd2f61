//! Generate command implementation
//!
//! Populates the active generation up to the configured sheet count,
//! creating a new active generation when none exists. Safe to re-run:
//! population resumes from the highest stored sheet number.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::core::content::RandomContentGenerator;
use crate::core::populate::{GenerationManager, SheetPopulator};
use clap::Args;
use std::sync::Arc;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Total sheets the generation should hold (defaults to the configured
    /// target)
    #[arg(long)]
    pub count: Option<u32>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting generate command");

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
            return Ok(5); // Fatal error exit code
        }

        let manager = GenerationManager::new(Arc::clone(&store));
        let populator = SheetPopulator::new(store.clone(), Arc::new(RandomContentGenerator::new()));

        let generation = match manager.ensure_active_generation().await {
            Ok(g) => g,
            Err(e) => {
                println!("❌ Failed to ensure an active generation");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        let target = self.count.unwrap_or(config.generation.target_sheets) as u64;
        let existing = store.sheet_count(generation.id).await?;

        println!("🎲 Generation: {}", generation.code);

        if existing >= target {
            println!("✅ Already holds {existing} sheets, nothing to do");
            return Ok(0);
        }

        let remaining = (target - existing) as u32;
        println!("   Generating {remaining} sheets ({existing} already present)…");

        let outcome = match populator.populate(&generation, remaining).await {
            Ok(o) => o,
            Err(e) => {
                println!("❌ Population failed");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!(
            "✅ Created {} sheets; generation now holds {}",
            outcome.created, outcome.final_count
        );
        if outcome.is_short() {
            println!("⚠️  Stopped at the 1000-sheet ceiling before reaching the target");
        }

        Ok(0)
    }
}
