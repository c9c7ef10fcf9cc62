use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::{BatchProgress, ConversionPolicy, ConversionResult, JobState, SourceFile};
use crate::processing::discovery::discover;
use crate::processing::engine::ConversionEngine;
use crate::utils::{
    ConversionError, ConverterError, ConverterResult, DEFAULT_EXTENSIONS, create_dir_all, normalize_extensions,
};

/// Everything a batch needs to run: where to read, where to write, and how.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub policy: ConversionPolicy,
    pub extensions: BTreeSet<String>,
}

impl BatchRequest {
    /// Request with the default policy and the HEIC/HEIF extension set.
    pub fn new(source_dir: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            policy: ConversionPolicy::default(),
            extensions: DEFAULT_EXTENSIONS.clone(),
        }
    }

    pub fn with_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = normalize_extensions(extensions);
        self
    }
}

/// One processed file and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub source: SourceFile,
    pub result: ConversionResult,
}

struct JobInner {
    engine: ConversionEngine,
    progress: watch::Sender<BatchProgress>,
    cancel_requested: AtomicBool,
    outcomes: Mutex<Vec<FileOutcome>>,
}

/// Read-only view of a job plus the ability to cancel it.
///
/// Cheap to clone and safe to hand to another task or thread (a UI loop,
/// a signal handler).
#[derive(Clone)]
pub struct JobHandle {
    inner: Arc<JobInner>,
}

impl JobHandle {
    /// Requests cooperative cancellation.
    ///
    /// Only honoured while the job is `Running`; returns whether the request
    /// was accepted. The file being converted finishes first. An accepted
    /// request ends the job in `Cancelled` unless a fatal error fails it.
    pub fn cancel(&self) -> bool {
        let mut accepted = false;
        // Decided under the progress lock so it cannot race the terminal update.
        self.inner.progress.send_if_modified(|p| {
            if p.state == JobState::Running {
                self.inner.cancel_requested.store(true, Ordering::SeqCst);
                accepted = true;
            }
            false
        });
        accepted
    }

    pub fn state(&self) -> JobState {
        self.inner.progress.borrow().state
    }

    /// Copy of the latest published progress.
    pub fn snapshot(&self) -> BatchProgress {
        self.inner.progress.borrow().clone()
    }

    /// Receiver notified after every progress update.
    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.inner.progress.subscribe()
    }
}

/// A one-shot, sequential, cancellable conversion batch.
///
/// Files are discovered up front, then converted one at a time in discovery
/// order on tokio's blocking pool. Cancellation is checked between files.
pub struct BatchJob {
    handle: JobHandle,
}

impl BatchJob {
    pub fn new(engine: ConversionEngine) -> Self {
        let (progress, _) = watch::channel(BatchProgress::new());
        Self {
            handle: JobHandle {
                inner: Arc::new(JobInner {
                    engine,
                    progress,
                    cancel_requested: AtomicBool::new(false),
                    outcomes: Mutex::new(Vec::new()),
                }),
            },
        }
    }

    pub fn handle(&self) -> JobHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    pub fn state(&self) -> JobState {
        self.handle.state()
    }

    pub fn snapshot(&self) -> BatchProgress {
        self.handle.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.handle.subscribe()
    }

    /// Per-file outcomes recorded so far, in processing order.
    pub fn outcomes(&self) -> Vec<FileOutcome> {
        self.handle.inner.outcomes.lock().clone()
    }

    /// Runs the batch to completion or cancellation and returns the terminal progress.
    ///
    /// Fails before any file is processed if the source root cannot be
    /// enumerated or the destination directory cannot be created. Per-file
    /// failures are only counted.
    pub async fn run(&self, mut request: BatchRequest) -> ConverterResult<BatchProgress> {
        let inner = &self.handle.inner;

        let started = inner.progress.send_if_modified(|p| {
            if p.state == JobState::Idle {
                p.state = JobState::Running;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(ConverterError::invalid_state(format!(
                "batch already {:?}, a job can only run once",
                self.state()
            )));
        }

        // Outputs are compared against absolute source paths.
        if let Ok(absolute) = std::path::absolute(&request.destination_dir) {
            request.destination_dir = absolute;
        }

        info!(
            "Starting batch: {} → {} (quality {}, keep names: {}, delete originals: {})",
            request.source_dir.display(),
            request.destination_dir.display(),
            request.policy.quality(),
            request.policy.keep_original_name(),
            request.policy.delete_source_on_success()
        );

        let files = match self.prepare(&request).await {
            Ok(files) => files,
            Err(e) => {
                warn!("Batch aborted: {}", e);
                inner.progress.send_modify(|p| p.state = JobState::Failed);
                return Err(e);
            }
        };

        let total = files.len();
        inner.progress.send_modify(|p| p.total = total);

        for (idx, source) in files.into_iter().enumerate() {
            if inner.cancel_requested.load(Ordering::SeqCst) {
                break;
            }

            let file_name = source.file_name();
            inner.progress.send_modify(|p| p.current_file = Some(file_name));

            let result = self.convert_one(&source, &request, idx + 1).await;
            let succeeded = result.is_success();

            inner.outcomes.lock().push(FileOutcome { source, result });
            inner.progress.send_modify(|p| {
                p.completed += 1;
                if succeeded {
                    p.succeeded += 1;
                }
            });

            if idx == 0 || (idx + 1) % 25 == 0 {
                debug!("Processed {}/{}", idx + 1, total);
            }
        }

        inner.progress.send_modify(|p| {
            let cancelled = inner.cancel_requested.load(Ordering::SeqCst);
            p.current_file = None;
            p.cancelled = cancelled;
            p.state = if cancelled { JobState::Cancelled } else { JobState::Completed };
        });

        let summary = self.snapshot();
        info!("{}", summary.summary());
        Ok(summary)
    }

    /// Discovers every input and creates the destination directory.
    async fn prepare(&self, request: &BatchRequest) -> ConverterResult<Vec<SourceFile>> {
        let root = request.source_dir.clone();
        let extensions = request.extensions.clone();
        let files = tokio::task::spawn_blocking(move || {
            discover(&root, &extensions).map(|d| d.iter().collect::<Vec<_>>())
        })
        .await
        .map_err(|e| ConverterError::task(format!("Discovery task failed: {e}")))??;

        if files.is_empty() {
            info!("No matching files found under {}", request.source_dir.display());
            return Ok(files);
        }

        info!("Found {} file(s) to convert", files.len());
        let destination = request.destination_dir.clone();
        tokio::task::spawn_blocking(move || create_dir_all(destination))
            .await
            .map_err(|e| ConverterError::task(format!("Directory creation task failed: {e}")))??;

        Ok(files)
    }

    async fn convert_one(&self, source: &SourceFile, request: &BatchRequest, position: usize) -> ConversionResult {
        let engine = self.handle.inner.engine.clone();
        let source = source.clone();
        let destination_dir = request.destination_dir.clone();
        let policy = request.policy;

        let path = source.absolute_path.clone();
        tokio::task::spawn_blocking(move || engine.convert(&source, &destination_dir, position, &policy))
            .await
            .unwrap_or_else(|e| {
                warn!("Conversion task for {} panicked: {}", path.display(), e);
                ConversionResult::Failure {
                    reason: ConversionError::decode(format!("Conversion task failed: {e}")),
                }
            })
    }
}
