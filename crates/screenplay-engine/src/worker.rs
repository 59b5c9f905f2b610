//! Background jobs over document snapshots.
//!
//! A job owns a [`DocumentSnapshot`] and runs on its own thread, so the live
//! document can keep changing. Jobs poll their [`CancelToken`] between units
//! of work (blocks or scenes) and stop early with [`Outcome::Cancelled`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::counters::{ChronometryConfig, CounterEngine};
use crate::editing::DocumentSnapshot;
use crate::errors::EngineError;
use crate::exchange::{self, BlockRecord};
use crate::reports::{self, ReportKind, ReportQuery, ReportSource, ReportTable};
use crate::scenes::{Scene, Scenes};
use crate::template::Template;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a job ended. Cancellation is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

pub type JobResult<T> = Result<Outcome<T>, EngineError>;

pub struct Job<T> {
    name: String,
    token: CancelToken,
    handle: JoinHandle<JobResult<T>>,
}

impl<T: Send + 'static> Job<T> {
    /// Run `work` on a new named thread.
    pub fn spawn<F>(name: &str, work: F) -> std::io::Result<Self>
    where
        F: FnOnce(&CancelToken) -> JobResult<T> + Send + 'static,
    {
        let token = CancelToken::new();
        let job_token = token.clone();
        let handle = std::thread::Builder::new()
            .name(format!("screenplay-{name}"))
            .spawn(move || work(&job_token))?;
        log::debug!("Started job {name}");
        Ok(Self {
            name: name.to_string(),
            token,
            handle,
        })
    }

    pub fn cancel(&self) {
        log::debug!("Cancelling job {}", self.name);
        self.token.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job. A panic inside the job is reported as an error when
    /// the build unwinds.
    pub fn join(self) -> JobResult<T> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::warn!("Job {} panicked: {message}", self.name);
                Err(EngineError::JobPanicked(message))
            }
        }
    }
}

/// Scenes with pages and durations filled in, checking `token` per block
/// while counting and per scene while segmenting.
pub fn scan_scenes(
    snapshot: &DocumentSnapshot,
    template: &Template,
    chronometry: &ChronometryConfig,
    token: &CancelToken,
) -> JobResult<(Vec<Scene>, CounterEngine)> {
    scan_scenes_while(snapshot, template, chronometry, || !token.is_cancelled())
}

fn scan_scenes_while(
    snapshot: &DocumentSnapshot,
    template: &Template,
    chronometry: &ChronometryConfig,
    mut keep_going: impl FnMut() -> bool,
) -> JobResult<(Vec<Scene>, CounterEngine)> {
    let doc = snapshot.to_document()?;
    let mut counters = CounterEngine::new(chronometry.clone())?;
    if counters
        .recount_while(&doc, template, &mut keep_going)
        .is_none()
    {
        return Ok(Outcome::Cancelled);
    }

    let mut scenes = Vec::new();
    for scene in Scenes::new(doc.blocks()).with_template(template) {
        if !keep_going() {
            return Ok(Outcome::Cancelled);
        }
        scenes.push(scene);
    }
    counters.annotate_scenes(&mut scenes);
    Ok(Outcome::Completed((scenes, counters)))
}

pub fn spawn_scene_scan(
    snapshot: DocumentSnapshot,
    template: Template,
    chronometry: ChronometryConfig,
) -> std::io::Result<Job<Vec<Scene>>> {
    Job::spawn("scenes", move |token| {
        let outcome = scan_scenes(&snapshot, &template, &chronometry, token)?;
        Ok(match outcome {
            Outcome::Completed((scenes, _)) => Outcome::Completed(scenes),
            Outcome::Cancelled => Outcome::Cancelled,
        })
    })
}

pub fn spawn_report(
    snapshot: DocumentSnapshot,
    template: Template,
    chronometry: ChronometryConfig,
    kind: ReportKind,
    query: ReportQuery,
) -> std::io::Result<Job<ReportTable>> {
    Job::spawn("report", move |token| {
        let Outcome::Completed((scenes, counters)) =
            scan_scenes(&snapshot, &template, &chronometry, token)?
        else {
            return Ok(Outcome::Cancelled);
        };
        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let source = ReportSource::new(&snapshot.blocks, &scenes).with_counters(counters.snapshot());
        Ok(Outcome::Completed(reports::build_report(&kind, &source, &query)?))
    })
}

/// Export, checking `token` per block.
pub fn spawn_export(snapshot: DocumentSnapshot) -> std::io::Result<Job<Vec<BlockRecord>>> {
    Job::spawn("export", move |token| {
        Ok(
            match exchange::export_while(&snapshot.blocks, || !token.is_cancelled()) {
                Some(records) => Outcome::Completed(records),
                None => Outcome::Cancelled,
            },
        )
    })
}
