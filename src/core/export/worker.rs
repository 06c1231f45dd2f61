//! Export worker body
//!
//! Runs on its own task and communicates only through the job's own status
//! fields; the caller that started the job already returned. Any failure in
//! here terminates the job as `Error` with the message captured, and the
//! partially written archive file is left on disk for diagnosis until the
//! retention sweep reclaims it.

use crate::adapters::store::traits::SheetStore;
use crate::core::archive::ArchiveWriter;
use crate::core::export::job::ExportJob;
use crate::domain::ids::GenerationCode;
use crate::domain::{Result, Sheet, TombolaError};
use crate::render::SheetRenderer;
use chrono::Utc;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How many entries between status message refreshes
const MESSAGE_INTERVAL: usize = 20;

/// Archive entry name for one sheet
///
/// The `Gen_<code>_Tabla_<number>` convention with the number zero-padded
/// to four digits is relied on by downstream consumers; don't change it.
pub fn entry_name(code: &GenerationCode, sheet_number: u32, extension: &str) -> String {
    format!("Gen_{}_Tabla_{:04}.{}", code, sheet_number, extension)
}

/// Run one export job to completion or failure
pub(crate) async fn run_export(
    job: Arc<ExportJob>,
    store: Arc<dyn SheetStore>,
    renderer: Arc<dyn SheetRenderer>,
    output_dir: PathBuf,
) {
    job.set_running();

    match export_generation(&job, store, renderer, &output_dir).await {
        Ok(path) => {
            tracing::info!(
                job_id = %job.id,
                generation_code = %job.generation_code,
                path = %path.display(),
                "Export job complete"
            );
            job.complete(path);
        }
        Err(e) => {
            tracing::error!(
                job_id = %job.id,
                generation_code = %job.generation_code,
                error = %e,
                "Export job failed"
            );
            job.fail(e.to_string());
        }
    }
}

async fn export_generation(
    job: &Arc<ExportJob>,
    store: Arc<dyn SheetStore>,
    renderer: Arc<dyn SheetRenderer>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let generation = store
        .find_generation_by_code(&job.generation_code)
        .await?
        .ok_or_else(|| {
            TombolaError::Export(format!("Generation {} not found", job.generation_code))
        })?;

    let sheets = store.sheets_for_generation(generation.id).await?;
    if sheets.is_empty() {
        return Err(TombolaError::Export(format!(
            "Generation {} has no sheets",
            job.generation_code
        )));
    }

    // Flip remaining stock before any rendering so the archive reflects the
    // final sale state.
    if job.mark_unassigned_as_sold {
        let changed = store.mark_unassigned_sold(generation.id, Utc::now()).await?;
        if changed > 0 {
            tracing::info!(
                generation_code = %job.generation_code,
                changed,
                "Marked unassigned sheets sold before export"
            );
        }
    }

    std::fs::create_dir_all(output_dir)?;
    let file_name = format!(
        "tombola_{}_{}_{}.zip",
        job.generation_code,
        Utc::now().format("%Y%m%d_%H%M%S"),
        job.id
    );
    let path = output_dir.join(file_name);

    job.set_progress(2);
    job.set_message("Rendering documents…");

    // The render/zip loop is synchronous; keep it off the async workers.
    let worker_job = Arc::clone(job);
    let worker_path = path.clone();
    tokio::task::spawn_blocking(move || {
        write_archive(&worker_job, renderer.as_ref(), &worker_path, &sheets)
    })
    .await
    .map_err(|e| TombolaError::Export(format!("Archive task aborted: {e}")))??;

    Ok(path)
}

/// Render every sheet in order and stream it into the archive
fn write_archive(
    job: &ExportJob,
    renderer: &dyn SheetRenderer,
    path: &Path,
    sheets: &[Sheet],
) -> Result<()> {
    let file = File::options()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)?;
    let mut archive = ArchiveWriter::new(file);

    let total = sheets.len();
    for (i, sheet) in sheets.iter().enumerate() {
        let bytes = renderer.render(
            &sheet.generation_code,
            sheet.sheet_number,
            &sheet.payload_json,
        )?;

        let name = entry_name(&sheet.generation_code, sheet.sheet_number, renderer.extension());
        archive.append(&name, &bytes)?;

        // 2..=99: the first unit of progress is reserved for setup, the
        // last for completion.
        let pct = 2 + (i + 1) * 97 / total;
        job.set_progress(pct.clamp(2, 99) as u8);

        if (i + 1) % MESSAGE_INTERVAL == 0 {
            job.set_message(format!("Rendering document {}/{}…", i + 1, total));
        }
    }

    archive.finish()?;
    Ok(())
}
