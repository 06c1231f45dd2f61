//! Export command implementation
//!
//! Starts a background export job for a generation, polls its progress and
//! fetches the finished archive.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::core::export::{ExportJobManager, JobStatus};
use crate::domain::ids::GenerationCode;
use crate::render::HtmlSheetRenderer;
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Generation code to export (defaults to the active generation)
    #[arg(long)]
    pub generation_code: Option<String>,

    /// Mark remaining unassigned sheets as sold before exporting
    #[arg(long)]
    pub mark_sold: bool,

    /// Copy the finished archive to this path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Poll interval while waiting for the job, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

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

        let code = match &self.generation_code {
            Some(raw) => match GenerationCode::from_str(raw.trim()) {
                Ok(code) => code,
                Err(e) => {
                    println!("❌ Invalid generation code: {e}");
                    return Ok(2);
                }
            },
            None => match store.active_generation().await? {
                Some(generation) => generation.code,
                None => {
                    println!("❌ No active generation to export");
                    return Ok(2);
                }
            },
        };

        let manager = Arc::new(ExportJobManager::new(
            store,
            Arc::new(HtmlSheetRenderer::new()),
            PathBuf::from(&config.export.output_dir),
            chrono::Duration::hours(config.export.retention_hours),
        ));

        let job_id = manager.start_job(code.clone(), self.mark_sold);
        println!("📦 Export job {job_id} started for generation {code}");

        // Poll until the job reaches a terminal state. The job never
        // blocks us; we only read its published status.
        let mut last_progress = 0;
        loop {
            tokio::time::sleep(Duration::from_millis(self.poll_interval_ms)).await;

            let view = match manager.status(&job_id) {
                Some(view) => view,
                None => {
                    println!("❌ Job disappeared from the registry");
                    return Ok(5);
                }
            };

            if view.progress != last_progress {
                println!("   {:>3}% {}", view.progress, view.message);
                last_progress = view.progress;
            }

            match view.status {
                JobStatus::Done => break,
                JobStatus::Error => {
                    println!("❌ Export failed: {}", view.message);
                    return Ok(5);
                }
                JobStatus::Pending | JobStatus::Running => {}
            }
        }

        let path = match manager.archive_path(&job_id) {
            Ok(path) => path,
            Err(e) => {
                println!("❌ Could not fetch the archive");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        match &self.output {
            Some(output) => {
                std::fs::copy(&path, output)?;
                println!("✅ Archive saved to {output}");
            }
            None => {
                println!("✅ Archive ready: {}", path.display());
            }
        }

        Ok(0)
    }
}
