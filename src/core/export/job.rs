//! Export job state
//!
//! A job's fields are written by exactly one worker and read by any number
//! of status pollers, so status and progress live in atomics and the
//! variable-width fields behind short parking_lot locks. No reader ever
//! blocks on the worker.

use crate::domain::ids::{GenerationCode, JobId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

/// Job state machine: `Pending -> Running -> {Done, Error}`
///
/// `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    /// Registered, worker not yet started
    Pending,
    /// Worker executing
    Running,
    /// Archive complete and on disk
    Done,
    /// Worker failed; message carries the cause
    Error,
}

impl JobStatus {
    /// Whether the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    fn as_u8(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Running => 1,
            JobStatus::Done => 2,
            JobStatus::Error => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => JobStatus::Pending,
            1 => JobStatus::Running,
            2 => JobStatus::Done,
            _ => JobStatus::Error,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Done => "Done",
            JobStatus::Error => "Error",
        };
        write!(f, "{s}")
    }
}

/// One export job's live state
///
/// Created by the job manager, mutated only by its own worker.
pub struct ExportJob {
    /// Job identifier
    pub id: JobId,

    /// Target generation
    pub generation_code: GenerationCode,

    /// Whether the worker flips remaining `Unassigned` sheets to `Sold`
    /// before exporting
    pub mark_unassigned_as_sold: bool,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,

    status: AtomicU8,
    progress: AtomicU8,
    message: Mutex<String>,
    archive_path: Mutex<Option<PathBuf>>,
    completed_at: Mutex<Option<DateTime<Utc>>>,
}

impl ExportJob {
    /// Register a new job in `Pending`
    pub fn new(id: JobId, generation_code: GenerationCode, mark_unassigned_as_sold: bool) -> Self {
        Self {
            id,
            generation_code,
            mark_unassigned_as_sold,
            created_at: Utc::now(),
            status: AtomicU8::new(JobStatus::Pending.as_u8()),
            progress: AtomicU8::new(0),
            message: Mutex::new("Starting…".to_string()),
            archive_path: Mutex::new(None),
            completed_at: Mutex::new(None),
        }
    }

    /// Current status
    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Current progress, 0..=100
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    /// Current human-readable status message
    pub fn message(&self) -> String {
        self.message.lock().clone()
    }

    /// Path of the produced archive, set on completion
    pub fn archive_path(&self) -> Option<PathBuf> {
        self.archive_path.lock().clone()
    }

    /// Completion timestamp, set only when the job reaches `Done`
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        *self.completed_at.lock()
    }

    /// Snapshot for status polling
    pub fn view(&self) -> JobView {
        JobView {
            id: self.id.clone(),
            generation_code: self.generation_code.clone(),
            status: self.status(),
            progress: self.progress(),
            message: self.message(),
        }
    }

    /// Worker: transition `Pending -> Running`
    pub(crate) fn set_running(&self) {
        self.status
            .store(JobStatus::Running.as_u8(), Ordering::Release);
        self.set_progress(1);
        self.set_message("Preparing…");
    }

    /// Worker: raise progress to `pct`
    ///
    /// Monotonic under the single-writer rule: a lower value never
    /// overwrites a higher one.
    pub(crate) fn set_progress(&self, pct: u8) {
        self.progress.fetch_max(pct.min(100), Ordering::AcqRel);
    }

    /// Worker: replace the status message
    pub(crate) fn set_message(&self, message: impl Into<String>) {
        *self.message.lock() = message.into();
    }

    /// Worker: record success
    pub(crate) fn complete(&self, path: PathBuf) {
        *self.archive_path.lock() = Some(path);
        *self.completed_at.lock() = Some(Utc::now());
        self.set_message("Archive ready");
        self.set_progress(100);
        self.status.store(JobStatus::Done.as_u8(), Ordering::Release);
    }

    /// Worker: record failure
    ///
    /// Progress is clamped so an errored job never reports 100%.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        let current = self.progress.load(Ordering::Acquire);
        self.progress.store(current.min(99), Ordering::Release);
        self.set_message(message);
        self.status
            .store(JobStatus::Error.as_u8(), Ordering::Release);
    }
}

/// Read-only snapshot of a job, as returned by status polling
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    /// Job identifier
    pub id: JobId,

    /// Target generation
    pub generation_code: GenerationCode,

    /// Current status
    pub status: JobStatus,

    /// Current progress, 0..=100
    pub progress: u8,

    /// Current human-readable message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn job() -> ExportJob {
        ExportJob::new(
            JobId::generate(),
            GenerationCode::from_str("AB23CD45EF").unwrap(),
            false,
        )
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = job();
        assert_eq!(job.status(), JobStatus::Pending);
        assert_eq!(job.progress(), 0);
        assert!(job.archive_path().is_none());
        assert!(job.completed_at().is_none());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let job = job();
        job.set_progress(40);
        job.set_progress(10);
        assert_eq!(job.progress(), 40);
        job.set_progress(41);
        assert_eq!(job.progress(), 41);
    }

    #[test]
    fn test_complete_sets_terminal_state() {
        let job = job();
        job.set_running();
        job.set_progress(99);
        job.complete(PathBuf::from("/tmp/archive.zip"));

        assert_eq!(job.status(), JobStatus::Done);
        assert_eq!(job.progress(), 100);
        assert!(job.completed_at().is_some());
        assert_eq!(job.archive_path(), Some(PathBuf::from("/tmp/archive.zip")));
    }

    #[test]
    fn test_fail_clamps_progress() {
        let job = job();
        job.set_running();
        job.set_progress(100);
        job.fail("boom");

        assert_eq!(job.status(), JobStatus::Error);
        assert!(job.progress() <= 99);
        assert_eq!(job.message(), "boom");
        // Errored jobs keep no completion time; cleanup falls back to
        // the creation time.
        assert!(job.completed_at().is_none());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Done,
            JobStatus::Error,
        ] {
            assert_eq!(JobStatus::from_u8(status.as_u8()), status);
        }
    }
}
