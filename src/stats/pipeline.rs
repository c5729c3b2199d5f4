//! stats::pipeline
//!
//! Enumerate the registry, analyze every subject, aggregate.
//!
//! Enumeration failures are fatal: without the subject universe no report
//! can be produced. Everything after enumeration degrades per subject or per
//! version and ends up in the report's error list.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use super::aggregate::aggregate;
use super::report::StatsReport;
use super::scheduler::{ProgressSink, Scheduler, SchedulerError};
use crate::registry::{Registry, RegistryError};

/// Errors that abort a stats run.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A registry-wide subject listing failed.
    #[error("failed to list {scope} subjects")]
    Enumeration {
        /// `"active"` or `"all"`
        scope: &'static str,
        #[source]
        source: RegistryError,
    },

    /// The run was cancelled before every subject was analyzed.
    #[error("scan cancelled after {completed} of {total} subjects")]
    Cancelled { completed: usize, total: usize },

    /// A worker task did not finish normally.
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

impl From<SchedulerError> for StatsError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::Cancelled { completed, total } => {
                StatsError::Cancelled { completed, total }
            }
            SchedulerError::WorkerFailed(message) => StatsError::WorkerFailed(message),
        }
    }
}

/// Collect statistics for the whole registry.
///
/// Lists active and all subjects, schedules every subject of the union on
/// `scheduler`, and aggregates the results. Internal subjects are scheduled
/// too so their versions are counted. A registry without any subject returns
/// a zeroed report without scheduling anything.
///
/// # Errors
///
/// - `Enumeration` if either subject listing fails
/// - `Cancelled` / `WorkerFailed` from the scheduler
pub async fn collect_stats(
    registry: Arc<dyn Registry>,
    scheduler: &Scheduler,
    progress: &dyn ProgressSink,
) -> Result<StatsReport, StatsError> {
    let active = list_all(registry.as_ref(), false).await?;
    let all = list_all(registry.as_ref(), true).await?;

    let universe = subject_universe(all, &active);
    info!(
        backend = registry.name(),
        active = active.len(),
        total = universe.len(),
        "enumerated subjects"
    );

    if universe.is_empty() {
        info!("registry is empty, skipping analysis");
        return Ok(StatsReport::default());
    }

    let partials = scheduler.run(registry, universe, progress).await?;
    Ok(aggregate(&partials, &active))
}

async fn list_all(registry: &dyn Registry, include_deleted: bool) -> Result<Vec<String>, StatsError> {
    registry.list_subjects(include_deleted).await.map_err(|source| {
        let scope = if include_deleted { "all" } else { "active" };
        error!(scope, error = %source, "subject enumeration failed");
        StatsError::Enumeration { scope, source }
    })
}

/// The including-deleted list plus active subjects it is missing.
///
/// The two listings are separate calls, so a subject registered between them
/// can appear only in the active list.
fn subject_universe(all: Vec<String>, active: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    all.into_iter()
        .chain(active.iter().cloned())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::mock::{record, FailOn, MockOperation, MockRegistry};
    use crate::stats::scheduler::NoProgress;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn universe_preserves_order_and_dedups() {
        let universe = subject_universe(names(&["a", "b", "c"]), &names(&["b", "d", "a"]));
        assert_eq!(universe, names(&["a", "b", "c", "d"]));
    }

    #[test]
    fn universe_dedups_within_one_listing() {
        let universe = subject_universe(names(&["a", "a"]), &[]);
        assert_eq!(universe, names(&["a"]));
    }

    #[tokio::test]
    async fn empty_registry_short_circuits() {
        let registry = Arc::new(MockRegistry::new());

        let report = collect_stats(registry.clone(), &Scheduler::new(4), &NoProgress)
            .await
            .unwrap();

        assert_eq!(report, StatsReport::default());
        assert_eq!(
            registry.count_operations(|op| matches!(op, MockOperation::ListVersions { .. })),
            0
        );
    }

    #[tokio::test]
    async fn internal_only_registry_counts_versions() {
        let registry = MockRegistry::new();
        registry.add_subject(
            "_confluent-ksql-q1",
            vec![
                record("_confluent-ksql-q1", 1, 1, "AVRO", "{}"),
                record("_confluent-ksql-q1", 2, 2, "AVRO", "{}"),
            ],
        );
        let registry = Arc::new(registry);

        let report = collect_stats(registry.clone(), &Scheduler::new(4), &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.stats.internal_subjects, 1);
        assert_eq!(report.stats.internal_versions, 2);
        assert_eq!(report.stats.total_subjects, 0);
        assert_eq!(report.stats.total_versions, 0);
        assert!(report.stats.top_by_versions.is_empty());
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn soft_deleted_subject_counts_as_deleted() {
        let registry = MockRegistry::new();
        registry.add_subject("live", vec![record("live", 1, 1, "AVRO", "{}")]);
        registry.add_subject(
            "gone",
            vec![
                record("gone", 1, 2, "AVRO", "{}"),
                record("gone", 2, 3, "AVRO", "{}"),
            ],
        );
        registry.soft_delete_subject("gone");

        let report = collect_stats(Arc::new(registry), &Scheduler::new(2), &NoProgress)
            .await
            .unwrap();

        let stats = report.stats;
        assert_eq!(stats.total_subjects, 2);
        assert_eq!(stats.active_subjects, 1);
        assert_eq!(stats.deleted_subjects, 1);
        assert_eq!(stats.total_versions, 3);
        assert_eq!(stats.active_versions, 1);
        assert_eq!(stats.deleted_versions, 2);
        assert_eq!(stats.failed_versions, 0);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn enumeration_failure_is_fatal() {
        let registry = MockRegistry::new().fail_on(FailOn::ListSubjectsWhen {
            include_deleted: true,
            error: RegistryError::NetworkError("connection refused".into()),
        });
        registry.add_subject("orders", vec![record("orders", 1, 1, "AVRO", "{}")]);

        let err = collect_stats(Arc::new(registry), &Scheduler::new(2), &NoProgress)
            .await
            .unwrap_err();

        match err {
            StatsError::Enumeration { scope, source } => {
                assert_eq!(scope, "all");
                assert_eq!(source, RegistryError::NetworkError("connection refused".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn active_listing_failure_is_fatal() {
        let registry = MockRegistry::new().fail_on(FailOn::ListSubjectsWhen {
            include_deleted: false,
            error: RegistryError::AuthFailed("invalid credentials".into()),
        });

        let err = collect_stats(Arc::new(registry), &Scheduler::new(2), &NoProgress)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to list active subjects");
    }

    #[test]
    fn scheduler_errors_convert() {
        let err: StatsError = SchedulerError::Cancelled {
            completed: 3,
            total: 9,
        }
        .into();
        assert_eq!(err.to_string(), "scan cancelled after 3 of 9 subjects");
    }
}
