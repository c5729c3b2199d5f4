//! registry::mock
//!
//! Mock registry implementation for deterministic testing.
//!
//! # Design
//!
//! The mock keeps subjects and versions in memory, honours soft-delete flags
//! the way a real registry does (hidden unless `deleted=true` is requested),
//! and allows configuring failures per operation and per subject/version.
//! An optional per-call latency makes concurrency observable in tests.
//!
//! # Example
//!
//! ```
//! use srstats::registry::mock::{record, MockRegistry};
//! use srstats::registry::Registry;
//!
//! # tokio_test::block_on(async {
//! let registry = MockRegistry::new();
//! registry.add_subject("orders", vec![record("orders", 1, 10, "AVRO", "\"string\"")]);
//! registry.soft_delete_version("orders", 1);
//!
//! assert!(registry.get_schema("orders", 1).await.is_err());
//! let found = registry.get_schema_including_deleted("orders", 1, true).await.unwrap();
//! assert_eq!(found.id, 10);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{Registry, RegistryError, SchemaRecord};

/// Build a schema record for seeding the mock.
pub fn record(
    subject: &str,
    version: u32,
    id: i64,
    schema_type: &str,
    schema: &str,
) -> SchemaRecord {
    SchemaRecord {
        subject: subject.to_string(),
        version,
        id,
        schema_type: schema_type.to_string(),
        schema: schema.to_string(),
        references: Vec::new(),
        deleted: false,
    }
}

/// Mock registry for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockRegistry {
    inner: Arc<Mutex<MockRegistryInner>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct MockRegistryInner {
    subjects: BTreeMap<String, MockSubject>,
    failures: Vec<FailOn>,
    latency: Option<Duration>,
    operations: Vec<MockOperation>,
    mode: String,
    compatibility: String,
    contexts: Vec<String>,
}

#[derive(Debug, Default)]
struct MockSubject {
    deleted: bool,
    versions: BTreeMap<u32, MockVersion>,
}

#[derive(Debug)]
struct MockVersion {
    record: SchemaRecord,
    deleted: bool,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail every subject listing.
    ListSubjects(RegistryError),
    /// Fail subject listing only for the given `include_deleted` value.
    ListSubjectsWhen {
        include_deleted: bool,
        error: RegistryError,
    },
    /// Fail version listing for one subject.
    ListVersions {
        subject: String,
        error: RegistryError,
    },
    /// Fail the normal fetch of one version.
    GetSchema {
        subject: String,
        version: u32,
        error: RegistryError,
    },
    /// Fail the deleted-inclusive fetch of one version.
    GetSchemaIncludingDeleted {
        subject: String,
        version: u32,
        error: RegistryError,
    },
    /// Fail the mode lookup.
    GetMode(RegistryError),
    /// Fail the compatibility lookup.
    GetCompatibility(RegistryError),
    /// Fail the context listing.
    ListContexts(RegistryError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListSubjects {
        include_deleted: bool,
    },
    ListVersions {
        subject: String,
        include_deleted: bool,
    },
    GetSchema {
        subject: String,
        version: u32,
    },
    GetSchemaIncludingDeleted {
        subject: String,
        version: u32,
        include_deleted: bool,
    },
    GetMode,
    GetCompatibility,
    ListContexts,
}

impl MockRegistry {
    /// Create a new empty mock registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRegistryInner {
                mode: "READWRITE".to_string(),
                compatibility: "BACKWARD".to_string(),
                contexts: vec![".".to_string()],
                ..MockRegistryInner::default()
            })),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockRegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add (or replace) a subject with the given versions.
    pub fn add_subject(&self, subject: &str, records: Vec<SchemaRecord>) {
        let versions = records
            .into_iter()
            .map(|record| {
                (
                    record.version,
                    MockVersion {
                        record,
                        deleted: false,
                    },
                )
            })
            .collect();
        self.state().subjects.insert(
            subject.to_string(),
            MockSubject {
                deleted: false,
                versions,
            },
        );
    }

    /// Add one version to a subject, creating the subject if needed.
    pub fn add_schema(&self, record: SchemaRecord) {
        let mut inner = self.state();
        let subject = inner.subjects.entry(record.subject.clone()).or_default();
        subject.versions.insert(
            record.version,
            MockVersion {
                record,
                deleted: false,
            },
        );
    }

    /// Soft-delete a subject (and hence all its versions).
    pub fn soft_delete_subject(&self, subject: &str) {
        if let Some(s) = self.state().subjects.get_mut(subject) {
            s.deleted = true;
            for v in s.versions.values_mut() {
                v.deleted = true;
            }
        }
    }

    /// Soft-delete one version.
    pub fn soft_delete_version(&self, subject: &str, version: u32) {
        if let Some(v) = self
            .state()
            .subjects
            .get_mut(subject)
            .and_then(|s| s.versions.get_mut(&version))
        {
            v.deleted = true;
        }
    }

    /// Add a failure rule. Rules accumulate.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().failures.push(fail_on);
        self
    }

    /// Clear all failure rules.
    pub fn clear_fail_on(&self) {
        self.state().failures.clear();
    }

    /// Delay every call by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state().latency = Some(latency);
        self
    }

    /// Set what the health endpoints report.
    pub fn with_server_settings(self, mode: &str, compatibility: &str, contexts: &[&str]) -> Self {
        {
            let mut inner = self.state();
            inner.mode = mode.to_string();
            inner.compatibility = compatibility.to_string();
            inner.contexts = contexts.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// Count recorded operations matching a predicate.
    pub fn count_operations(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        self.state().operations.iter().filter(|op| pred(op)).count()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, op: MockOperation) {
        self.state().operations.push(op);
    }

    /// Account for one call, sleeping for the configured latency.
    async fn enter(&self) -> InFlightGuard {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        guard
    }

    fn check_fail(&self, matches: impl Fn(&FailOn) -> Option<&RegistryError>) -> Result<(), RegistryError> {
        let inner = self.state();
        match inner.failures.iter().find_map(matches) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn lookup(
        &self,
        subject: &str,
        version: u32,
        include_deleted: bool,
    ) -> Result<SchemaRecord, RegistryError> {
        let inner = self.state();
        let s = inner
            .subjects
            .get(subject)
            .ok_or_else(|| RegistryError::NotFound(format!("subject '{}'", subject)))?;
        match s.versions.get(&version) {
            Some(v) if include_deleted || !v.deleted => {
                let mut record = v.record.clone();
                record.deleted = v.deleted;
                Ok(record)
            }
            _ => Err(RegistryError::NotFound(format!(
                "version {} of subject '{}'",
                version, subject
            ))),
        }
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter when a call finishes.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_subjects(&self, include_deleted: bool) -> Result<Vec<String>, RegistryError> {
        self.record(MockOperation::ListSubjects { include_deleted });
        let _guard = self.enter().await;

        self.check_fail(|f| match f {
            FailOn::ListSubjects(e) => Some(e),
            FailOn::ListSubjectsWhen {
                include_deleted: when,
                error,
            } if *when == include_deleted => Some(error),
            _ => None,
        })?;

        Ok(self
            .state()
            .subjects
            .iter()
            .filter(|(_, s)| include_deleted || !s.deleted)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn list_versions(
        &self,
        subject: &str,
        include_deleted: bool,
    ) -> Result<Vec<u32>, RegistryError> {
        self.record(MockOperation::ListVersions {
            subject: subject.to_string(),
            include_deleted,
        });
        let _guard = self.enter().await;

        self.check_fail(|f| match f {
            FailOn::ListVersions { subject: s, error } if s == subject => Some(error),
            _ => None,
        })?;

        let inner = self.state();
        match inner.subjects.get(subject) {
            Some(s) if include_deleted || !s.deleted => Ok(s
                .versions
                .iter()
                .filter(|(_, v)| include_deleted || !v.deleted)
                .map(|(n, _)| *n)
                .collect()),
            _ => Err(RegistryError::NotFound(format!("subject '{}'", subject))),
        }
    }

    async fn get_schema(&self, subject: &str, version: u32) -> Result<SchemaRecord, RegistryError> {
        self.record(MockOperation::GetSchema {
            subject: subject.to_string(),
            version,
        });
        let _guard = self.enter().await;

        self.check_fail(|f| match f {
            FailOn::GetSchema {
                subject: s,
                version: v,
                error,
            } if s == subject && *v == version => Some(error),
            _ => None,
        })?;

        self.lookup(subject, version, false)
    }

    async fn get_schema_including_deleted(
        &self,
        subject: &str,
        version: u32,
        include_deleted: bool,
    ) -> Result<SchemaRecord, RegistryError> {
        self.record(MockOperation::GetSchemaIncludingDeleted {
            subject: subject.to_string(),
            version,
            include_deleted,
        });
        let _guard = self.enter().await;

        self.check_fail(|f| match f {
            FailOn::GetSchemaIncludingDeleted {
                subject: s,
                version: v,
                error,
            } if s == subject && *v == version => Some(error),
            _ => None,
        })?;

        self.lookup(subject, version, include_deleted)
    }

    async fn get_mode(&self) -> Result<String, RegistryError> {
        self.record(MockOperation::GetMode);
        self.check_fail(|f| match f {
            FailOn::GetMode(e) => Some(e),
            _ => None,
        })?;
        Ok(self.state().mode.clone())
    }

    async fn get_compatibility(&self) -> Result<String, RegistryError> {
        self.record(MockOperation::GetCompatibility);
        self.check_fail(|f| match f {
            FailOn::GetCompatibility(e) => Some(e),
            _ => None,
        })?;
        Ok(self.state().compatibility.clone())
    }

    async fn list_contexts(&self) -> Result<Vec<String>, RegistryError> {
        self.record(MockOperation::ListContexts);
        self.check_fail(|f| match f {
            FailOn::ListContexts(e) => Some(e),
            _ => None,
        })?;
        Ok(self.state().contexts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MockRegistry {
        let registry = MockRegistry::new();
        registry.add_subject(
            "orders",
            vec![
                record("orders", 1, 1, "", "\"string\""),
                record("orders", 2, 2, "AVRO", "\"long\""),
            ],
        );
        registry.add_subject("payments", vec![record("payments", 1, 3, "JSON", "{}")]);
        registry
    }

    #[tokio::test]
    async fn soft_deleted_subject_hidden_from_active_listing() {
        let registry = seeded();
        registry.soft_delete_subject("payments");

        assert_eq!(registry.list_subjects(false).await.unwrap(), vec!["orders"]);
        assert_eq!(
            registry.list_subjects(true).await.unwrap(),
            vec!["orders", "payments"]
        );
        assert!(registry.list_versions("payments", false).await.is_err());
        assert_eq!(registry.list_versions("payments", true).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn soft_deleted_version_needs_deleted_fetch() {
        let registry = seeded();
        registry.soft_delete_version("orders", 2);

        assert_eq!(registry.list_versions("orders", false).await.unwrap(), vec![1]);
        assert_eq!(registry.list_versions("orders", true).await.unwrap(), vec![1, 2]);

        let err = registry.get_schema("orders", 2).await.unwrap_err();
        assert!(err.is_not_found());

        let found = registry
            .get_schema_including_deleted("orders", 2, true)
            .await
            .unwrap();
        assert!(found.deleted);
        assert_eq!(found.id, 2);

        assert!(registry
            .get_schema_including_deleted("orders", 2, false)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn fail_on_targets_one_version() {
        let registry = seeded().fail_on(FailOn::GetSchema {
            subject: "orders".into(),
            version: 1,
            error: RegistryError::RateLimited,
        });

        assert_eq!(
            registry.get_schema("orders", 1).await.unwrap_err(),
            RegistryError::RateLimited
        );
        assert!(registry.get_schema("orders", 2).await.is_ok());

        registry.clear_fail_on();
        assert!(registry.get_schema("orders", 1).await.is_ok());
    }

    #[tokio::test]
    async fn fail_on_subject_listing_by_flag() {
        let registry = seeded().fail_on(FailOn::ListSubjectsWhen {
            include_deleted: true,
            error: RegistryError::NetworkError("reset".into()),
        });

        assert!(registry.list_subjects(false).await.is_ok());
        assert!(registry.list_subjects(true).await.is_err());
    }

    #[tokio::test]
    async fn operations_are_recorded() {
        let registry = seeded();
        registry.list_versions("orders", true).await.unwrap();
        registry.get_schema("orders", 1).await.unwrap();

        assert_eq!(
            registry.operations(),
            vec![
                MockOperation::ListVersions {
                    subject: "orders".into(),
                    include_deleted: true
                },
                MockOperation::GetSchema {
                    subject: "orders".into(),
                    version: 1
                },
            ]
        );
        assert_eq!(
            registry.count_operations(|op| matches!(op, MockOperation::GetSchema { .. })),
            1
        );
    }

    #[tokio::test]
    async fn add_schema_creates_subject() {
        let registry = MockRegistry::new();
        registry.add_schema(record("users", 4, 9, "PROTOBUF", "syntax = \"proto3\";"));
        assert_eq!(registry.list_versions("users", false).await.unwrap(), vec![4]);
    }

    #[tokio::test]
    async fn server_settings_reported() {
        let registry =
            MockRegistry::new().with_server_settings("READONLY", "FULL", &[".", ".prod"]);
        assert_eq!(registry.get_mode().await.unwrap(), "READONLY");
        assert_eq!(registry.get_compatibility().await.unwrap(), "FULL");
        assert_eq!(registry.list_contexts().await.unwrap(), vec![".", ".prod"]);
    }
}
