//! Export job manager
//!
//! In-process registry of export jobs. The registry is an explicit,
//! injected structure created at startup; only the registry map needs
//! locking, since each job's own fields are written by exactly one worker.

use crate::adapters::store::traits::SheetStore;
use crate::core::export::job::{ExportJob, JobStatus, JobView};
use crate::core::export::worker::run_export;
use crate::domain::ids::{GenerationCode, JobId};
use crate::domain::{JobError, Result};
use crate::render::SheetRenderer;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

type JobMap = HashMap<JobId, Arc<ExportJob>>;

/// Registry and lifecycle of export jobs
///
/// Jobs are process-local and in-memory only: they do not survive a
/// restart. Sheets written by a lost job remain durable in the store.
pub struct ExportJobManager {
    jobs: Arc<RwLock<JobMap>>,
    store: Arc<dyn SheetStore>,
    renderer: Arc<dyn SheetRenderer>,
    output_dir: PathBuf,
    retention: Duration,
}

impl ExportJobManager {
    /// Create a new manager
    ///
    /// # Arguments
    ///
    /// * `store` - Sheet store the workers read from
    /// * `renderer` - Document renderer
    /// * `output_dir` - Directory archives are written to
    /// * `retention` - Age after which finished jobs and their archives are
    ///   reclaimed
    pub fn new(
        store: Arc<dyn SheetStore>,
        renderer: Arc<dyn SheetRenderer>,
        output_dir: PathBuf,
        retention: Duration,
    ) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            store,
            renderer,
            output_dir,
            retention,
        }
    }

    /// Start an export job, or return the one already running
    ///
    /// At most one job per generation code is in `Pending` or `Running` at
    /// any instant: the scan and the insert happen under one registry write
    /// lock, so two simultaneous start requests for the same code get the
    /// same id. The caller never blocks on the job itself.
    pub fn start_job(
        &self,
        generation_code: GenerationCode,
        mark_unassigned_as_sold: bool,
    ) -> JobId {
        let job = {
            let mut jobs = self.jobs.write();

            if let Some(existing) = jobs
                .values()
                .find(|j| j.generation_code == generation_code && !j.status().is_terminal())
            {
                tracing::info!(
                    job_id = %existing.id,
                    generation_code = %generation_code,
                    "Reusing in-flight export job"
                );
                return existing.id.clone();
            }

            let job = Arc::new(ExportJob::new(
                JobId::generate(),
                generation_code,
                mark_unassigned_as_sold,
            ));
            jobs.insert(job.id.clone(), Arc::clone(&job));
            job
        };

        tracing::info!(
            job_id = %job.id,
            generation_code = %job.generation_code,
            mark_unassigned_as_sold,
            "Registered export job"
        );

        let worker = tokio::spawn(run_export(
            Arc::clone(&job),
            Arc::clone(&self.store),
            Arc::clone(&self.renderer),
            self.output_dir.clone(),
        ));

        // The handle is watched for logging only; the job's own fields are
        // the source of truth for its lifecycle.
        let watched = Arc::clone(&job);
        let registry = Arc::clone(&self.jobs);
        let retention = self.retention;
        tokio::spawn(async move {
            match worker.await {
                Ok(()) => {
                    if watched.status() == JobStatus::Done {
                        sweep_jobs(&registry, retention);
                    }
                }
                Err(e) => {
                    tracing::error!(job_id = %watched.id, error = %e, "Export worker task aborted");
                    watched.fail(format!("Worker aborted: {e}"));
                }
            }
        });

        job.id.clone()
    }

    /// Snapshot a job's current status
    ///
    /// An unknown id yields `None`, not an error.
    pub fn status(&self, id: &JobId) -> Option<JobView> {
        self.jobs.read().get(id).map(|job| job.view())
    }

    /// Look up a job by id
    pub fn job(&self, id: &JobId) -> Option<Arc<ExportJob>> {
        self.jobs.read().get(id).cloned()
    }

    /// Number of registered jobs
    pub fn job_count(&self) -> usize {
        self.jobs.read().len()
    }

    /// Path of a finished job's archive
    ///
    /// # Errors
    ///
    /// * [`JobError::NotFound`] for an unknown id
    /// * [`JobError::NotReady`] while the job has not reached `Done`
    /// * [`JobError::ArchiveMissing`] when the file was already reclaimed
    pub fn archive_path(&self, id: &JobId) -> Result<PathBuf> {
        let job = self
            .jobs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        let status = job.status();
        if status != JobStatus::Done {
            return Err(JobError::NotReady {
                id: id.to_string(),
                status: status.to_string(),
            }
            .into());
        }

        let path = job
            .archive_path()
            .ok_or_else(|| JobError::ArchiveMissing(id.to_string()))?;
        if !path.exists() {
            return Err(JobError::ArchiveMissing(path.display().to_string()).into());
        }

        Ok(path)
    }

    /// Reclaim jobs past the configured retention window
    pub fn cleanup(&self) -> usize {
        self.cleanup_older_than(self.retention)
    }

    /// Reclaim jobs whose completion time (or creation time, if they never
    /// completed) is older than `retention`
    ///
    /// Archive files are deleted best-effort. A job still running when the
    /// sweep passes is left alone: its timestamp has not aged past the
    /// cutoff.
    pub fn cleanup_older_than(&self, retention: Duration) -> usize {
        sweep_jobs(&self.jobs, retention)
    }
}

/// Remove expired jobs from the registry, deleting their archives
fn sweep_jobs(jobs: &RwLock<JobMap>, retention: Duration) -> usize {
    let cutoff = Utc::now() - retention;
    let mut removed = 0;

    let mut jobs = jobs.write();
    jobs.retain(|_, job| {
        let done_time = job.completed_at().unwrap_or(job.created_at);
        if done_time >= cutoff {
            return true;
        }

        if let Some(path) = job.archive_path() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Could not delete archive during cleanup"
                );
            }
        }

        tracing::info!(job_id = %job.id, status = %job.status(), "Removed expired export job");
        removed += 1;
        false
    });

    removed
}
