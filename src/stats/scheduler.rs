//! stats::scheduler
//!
//! Bounded worker pool that analyzes subjects in parallel.
//!
//! # Design
//!
//! A feeder task pushes every subject name into a job channel and closes it.
//! `workers` tasks share the receiving end behind an async mutex, so each
//! subject is taken by exactly one worker. Workers send their
//! [`SubjectAnalysis`] into an unbounded results channel; the collector (the
//! caller's task) drains it, counts completions and reports progress. The
//! results channel closes once the last worker drops its sender, after which
//! the pool is joined so no task outlives [`Scheduler::run`].
//!
//! Result order is whatever order workers finish in.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::analyzer::{analyze_subject, SubjectAnalysis};
use crate::registry::Registry;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 20;

/// Errors from a scheduler run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The run was cancelled before every subject was analyzed.
    #[error("scan cancelled after {completed} of {total} subjects")]
    Cancelled { completed: usize, total: usize },

    /// A worker task panicked or was aborted; its subject has no result.
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

/// Receives progress as subjects complete.
///
/// `advanced` is called from a single task with `completed` increasing by
/// one each call.
pub trait ProgressSink: Send + Sync {
    /// The run is about to start.
    fn started(&self, _total: usize) {}

    /// One more subject finished.
    fn advanced(&self, completed: usize, total: usize, subject: &str);

    /// The run finished (successfully or not).
    fn finished(&self) {}
}

/// A progress sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advanced(&self, _completed: usize, _total: usize, _subject: &str) {}
}

/// Parallel subject scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    cancel: CancellationToken,
}

impl Scheduler {
    /// Create a scheduler with `workers` concurrent workers (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to stop the run early.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Effective worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analyze every subject and return one result per subject.
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the token fired before all subjects completed
    /// - `WorkerFailed` if a worker task did not finish normally
    pub async fn run(
        &self,
        registry: Arc<dyn Registry>,
        subjects: Vec<String>,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<SubjectAnalysis>, SchedulerError> {
        let total = subjects.len();
        info!(workers = self.workers, subjects = total, "starting subject analysis");
        progress.started(total);

        let (job_tx, job_rx) = mpsc::channel::<String>(total.max(1));
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<SubjectAnalysis>();

        let feeder = tokio::spawn(async move {
            for subject in subjects {
                if job_tx.send(subject).await.is_err() {
                    break;
                }
            }
        });

        let mut pool = JoinSet::new();
        for worker in 0..self.workers {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let registry = Arc::clone(&registry);
            let cancel = self.cancel.clone();

            pool.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let next = jobs.lock().await.recv().await;
                    let Some(subject) = next else {
                        break;
                    };
                    let analysis = analyze_subject(registry.as_ref(), &subject, &cancel).await;
                    if results.send(analysis).is_err() {
                        break;
                    }
                }
                debug!(worker, "worker finished");
            });
        }
        drop(result_tx);

        let mut collected = Vec::with_capacity(total);
        while let Some(analysis) = result_rx.recv().await {
            debug!(
                subject = %analysis.subject,
                versions = analysis.version_count,
                errors = analysis.errors.len(),
                "subject analyzed"
            );
            progress.advanced(collected.len() + 1, total, &analysis.subject);
            collected.push(analysis);
        }

        let mut failure = None;
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                if failure.is_none() {
                    failure = Some(e.to_string());
                }
            }
        }
        // Workers are gone; a cancelled run may leave the feeder blocked on a full channel.
        feeder.abort();
        let _ = feeder.await;

        progress.finished();
        info!(completed = collected.len(), total, "subject analysis finished");

        if let Some(message) = failure {
            return Err(SchedulerError::WorkerFailed(message));
        }
        // A token fired after the last subject finished does not void the run.
        if collected.len() < total || collected.iter().any(|a| a.interrupted) {
            return Err(SchedulerError::Cancelled {
                completed: collected.len(),
                total,
            });
        }
        Ok(collected)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
