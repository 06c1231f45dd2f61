//! Regenerate command implementation
//!
//! Destructive: deactivates every generation, deletes every sheet and
//! populates a fresh active generation.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::core::content::RandomContentGenerator;
use crate::core::populate::{GenerationManager, SheetPopulator};
use clap::Args;
use std::sync::Arc;

/// Arguments for the regenerate command
#[derive(Args, Debug)]
pub struct RegenerateArgs {
    /// Total sheets the new generation should hold (defaults to the
    /// configured target)
    #[arg(long)]
    pub count: Option<u32>,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl RegenerateArgs {
    /// Execute the regenerate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting regenerate command");

        if !self.yes {
            println!("❌ Regeneration deletes every sheet of every generation.");
            println!("   Re-run with --yes to confirm.");
            return Ok(2);
        }

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let store = match create_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to store");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        if let Err(e) = store.ensure_schema().await {
            println!("❌ Failed to initialize store schema");
            println!("   Error: {e}");
            return Ok(5);
        }

        let manager = GenerationManager::new(Arc::clone(&store));
        let populator = SheetPopulator::new(store, Arc::new(RandomContentGenerator::new()));

        let target = self.count.unwrap_or(config.generation.target_sheets);

        let (generation, outcome) = match manager.regenerate(&populator, target).await {
            Ok(result) => result,
            Err(e) => {
                println!("❌ Regeneration failed");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!(
            "✅ Regenerated: new generation {} holds {} sheets",
            generation.code, outcome.final_count
        );

        Ok(0)
    }
}
