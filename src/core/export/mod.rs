//! Batch export jobs
//!
//! Long-lived background jobs that render every sheet of a generation and
//! stream the documents into a single ZIP archive on disk, exposing a
//! pollable progress/status view.

pub mod job;
pub mod manager;
pub mod worker;

pub use job::{ExportJob, JobStatus, JobView};
pub use manager::ExportJobManager;
pub use worker::entry_name;
