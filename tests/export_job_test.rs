//! Integration tests for the batch export job manager
//!
//! Full job lifecycle against the in-memory store: idempotent starts,
//! progress reporting, archive contents, mark-sold semantics and the
//! retention sweep.

use chrono::Duration as ChronoDuration;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tombola::adapters::store::{MemoryStore, SheetStore};
use tombola::core::content::RandomContentGenerator;
use tombola::core::export::{entry_name, ExportJobManager, JobStatus};
use tombola::core::populate::SheetPopulator;
use tombola::domain::ids::{GenerationCode, JobId};
use tombola::domain::{Generation, NewGeneration, SheetStatus, TombolaError};
use tombola::render::{HtmlSheetRenderer, SheetRenderer};

/// Renderer that delays each document, keeping jobs observably in-flight
struct SlowRenderer {
    inner: HtmlSheetRenderer,
    delay: Duration,
}

impl SlowRenderer {
    fn new(delay: Duration) -> Self {
        Self {
            inner: HtmlSheetRenderer::new(),
            delay,
        }
    }
}

impl SheetRenderer for SlowRenderer {
    fn render(
        &self,
        code: &GenerationCode,
        sheet_number: u32,
        payload_json: &str,
    ) -> tombola::domain::Result<Vec<u8>> {
        std::thread::sleep(self.delay);
        self.inner.render(code, sheet_number, payload_json)
    }

    fn extension(&self) -> &'static str {
        self.inner.extension()
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    manager: Arc<ExportJobManager>,
    _output: TempDir,
}

fn harness_with_renderer(renderer: Arc<dyn SheetRenderer>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let output = TempDir::new().unwrap();
    let manager = Arc::new(ExportJobManager::new(
        store.clone(),
        renderer,
        output.path().to_path_buf(),
        ChronoDuration::hours(2),
    ));
    Harness {
        store,
        manager,
        _output: output,
    }
}

fn harness() -> Harness {
    harness_with_renderer(Arc::new(HtmlSheetRenderer::new()))
}

async fn seed_generation(store: &Arc<MemoryStore>, code: &str, sheets: u32) -> Generation {
    let generation = store
        .insert_generation(NewGeneration::active(
            GenerationCode::from_str(code).unwrap(),
        ))
        .await
        .unwrap();

    if sheets > 0 {
        let populator =
            SheetPopulator::new(store.clone(), Arc::new(RandomContentGenerator::new()));
        populator.populate(&generation, sheets).await.unwrap();
    }

    generation
}

async fn wait_terminal(manager: &ExportJobManager, id: &JobId) -> JobStatus {
    for _ in 0..600 {
        let view = manager.status(id).expect("job registered");
        if view.status.is_terminal() {
            return view.status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job did not reach a terminal state in time");
}

#[tokio::test]
async fn finished_job_archives_every_sheet_by_name() {
    let harness = harness();
    let generation = seed_generation(&harness.store, "AB23CD45EF", 3).await;

    let id = harness
        .manager
        .start_job(generation.code.clone(), true);
    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Done);

    let view = harness.manager.status(&id).unwrap();
    assert_eq!(view.progress, 100);

    // All sheets flipped to Sold before the export
    let sheets = harness
        .store
        .sheets_for_generation(generation.id)
        .await
        .unwrap();
    assert!(sheets.iter().all(|s| s.status == SheetStatus::Sold));
    assert!(sheets.iter().all(|s| s.sold_at.is_some()));

    // Archive holds exactly one correctly named entry per sheet, in order,
    // and every entry reproduces the renderer's output byte for byte.
    let path = harness.manager.archive_path(&id).unwrap();
    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 3);

    let renderer = HtmlSheetRenderer::new();
    for (i, sheet) in sheets.iter().enumerate() {
        let mut entry = archive.by_index(i).unwrap();
        assert_eq!(
            entry.name(),
            entry_name(&generation.code, sheet.sheet_number, "html")
        );
        assert_eq!(
            entry.name(),
            format!("Gen_AB23CD45EF_Tabla_000{}.html", i + 1)
        );

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        let expected = renderer
            .render(&sheet.generation_code, sheet.sheet_number, &sheet.payload_json)
            .unwrap();
        assert_eq!(bytes, expected);
    }
}

#[tokio::test]
async fn mark_sold_keeps_earlier_sale_timestamps() {
    let harness = harness();

    // One sheet sold ahead of time, two still unassigned
    let generation = seed_generation(&harness.store, "AB23CD45EF", 1).await;
    harness
        .store
        .mark_unassigned_sold(generation.id, chrono::Utc::now())
        .await
        .unwrap();
    let earlier_sold_at = harness
        .store
        .sheets_for_generation(generation.id)
        .await
        .unwrap()[0]
        .sold_at;

    let populator = SheetPopulator::new(
        harness.store.clone(),
        Arc::new(RandomContentGenerator::new()),
    );
    populator.populate(&generation, 2).await.unwrap();

    let id = harness
        .manager
        .start_job(generation.code.clone(), true);
    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Done);

    let sheets = harness
        .store
        .sheets_for_generation(generation.id)
        .await
        .unwrap();
    assert_eq!(sheets.len(), 3);
    assert!(sheets.iter().all(|s| s.status == SheetStatus::Sold));

    // Sale transitions are forward-only: the pre-sold sheet keeps its
    // original timestamp.
    assert_eq!(sheets[0].sold_at, earlier_sold_at);
    assert!(sheets[1].sold_at > earlier_sold_at);
}

#[tokio::test]
async fn starting_twice_reuses_the_inflight_job() {
    let harness = harness_with_renderer(Arc::new(SlowRenderer::new(Duration::from_millis(20))));
    let generation = seed_generation(&harness.store, "AB23CD45EF", 25).await;

    let first = harness.manager.start_job(generation.code.clone(), false);
    let second = harness.manager.start_job(generation.code.clone(), false);
    assert_eq!(first, second);
    assert_eq!(harness.manager.job_count(), 1);

    assert_eq!(
        wait_terminal(&harness.manager, &first).await,
        JobStatus::Done
    );

    // Terminal job: a new start registers a fresh one
    let third = harness.manager.start_job(generation.code.clone(), false);
    assert_ne!(first, third);
    assert_eq!(wait_terminal(&harness.manager, &third).await, JobStatus::Done);
}

#[tokio::test]
async fn progress_is_monotonic_and_capped_until_done() {
    let harness = harness_with_renderer(Arc::new(SlowRenderer::new(Duration::from_millis(5))));
    let generation = seed_generation(&harness.store, "AB23CD45EF", 40).await;

    let id = harness.manager.start_job(generation.code.clone(), false);

    let mut observed = Vec::new();
    loop {
        let view = harness.manager.status(&id).unwrap();
        observed.push((view.status, view.progress));
        if view.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    for window in observed.windows(2) {
        assert!(window[1].1 >= window[0].1, "progress went backwards");
    }
    for (status, progress) in &observed {
        match status {
            JobStatus::Done => assert_eq!(*progress, 100),
            _ => assert!(*progress <= 99),
        }
    }
    assert_eq!(observed.last().unwrap().0, JobStatus::Done);
}

#[tokio::test]
async fn missing_generation_fails_the_job_not_the_caller() {
    let harness = harness();
    let code = GenerationCode::from_str("ZZ23CD45EF").unwrap();

    // start_job returns immediately; the failure lands on the job itself
    let id = harness.manager.start_job(code, false);
    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Error);

    let view = harness.manager.status(&id).unwrap();
    assert!(view.message.contains("not found"));
    assert!(view.progress <= 99);
}

#[tokio::test]
async fn empty_generation_fails_the_job() {
    let harness = harness();
    let generation = seed_generation(&harness.store, "AB23CD45EF", 0).await;

    let id = harness.manager.start_job(generation.code.clone(), false);
    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Error);

    let view = harness.manager.status(&id).unwrap();
    assert!(view.message.contains("no sheets"));
}

#[tokio::test]
async fn archive_fetch_respects_job_state() {
    let harness = harness_with_renderer(Arc::new(SlowRenderer::new(Duration::from_millis(20))));
    let generation = seed_generation(&harness.store, "AB23CD45EF", 20).await;

    let id = harness.manager.start_job(generation.code.clone(), false);

    // Not ready while the job is still running
    let err = harness.manager.archive_path(&id).unwrap_err();
    assert!(matches!(
        err,
        TombolaError::Job(tombola::domain::JobError::NotReady { .. })
    ));

    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Done);
    let path = harness.manager.archive_path(&id).unwrap();
    assert!(path.exists());

    // A Done job whose file was removed behind our back is a missing
    // archive, not a success
    std::fs::remove_file(&path).unwrap();
    let err = harness.manager.archive_path(&id).unwrap_err();
    assert!(matches!(
        err,
        TombolaError::Job(tombola::domain::JobError::ArchiveMissing(_))
    ));
}

#[tokio::test]
async fn cleanup_reclaims_finished_jobs_and_their_archives() {
    let harness = harness();
    let generation = seed_generation(&harness.store, "AB23CD45EF", 3).await;

    let id = harness.manager.start_job(generation.code.clone(), false);
    assert_eq!(wait_terminal(&harness.manager, &id).await, JobStatus::Done);
    let path = harness.manager.archive_path(&id).unwrap();

    // Within the window the job survives
    assert_eq!(harness.manager.cleanup_older_than(ChronoDuration::hours(1)), 0);
    assert!(harness.manager.status(&id).is_some());

    // Past the window the job and its archive are gone
    assert_eq!(
        harness
            .manager
            .cleanup_older_than(ChronoDuration::seconds(-1)),
        1
    );
    assert!(harness.manager.status(&id).is_none());
    assert!(!path.exists());

    let err = harness.manager.archive_path(&id).unwrap_err();
    assert!(matches!(
        err,
        TombolaError::Job(tombola::domain::JobError::NotFound(_))
    ));
}
