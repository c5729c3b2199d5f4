//! stats::analyzer
//!
//! Per-subject analysis.
//!
//! # Design
//!
//! [`analyze_subject`] walks every version of one subject and folds what it
//! fetches into a [`SubjectAnalysis`]. It never fails: listing or fetch
//! errors are recorded as strings on the result and the offending version is
//! skipped, while still counting towards `version_count`.
//!
//! Fetching a version is a two-step fallback chain: the normal fetch, then a
//! deleted-inclusive fetch for versions that were soft-deleted. The first
//! success wins; if both fail, both errors are reported.

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::types::{is_internal_subject, SchemaType};
use crate::registry::{Registry, RegistryError, SchemaRecord};

/// Partial statistics for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAnalysis {
    /// Subject name
    pub subject: String,
    /// Whether the subject is internal (decided from the name alone)
    pub is_internal: bool,
    /// Number of listed versions, fetched or not
    pub version_count: usize,
    /// Total bytes across fetched versions
    pub total_size: u64,
    /// Smallest non-empty fetched version
    pub min_size: Option<u64>,
    /// Largest fetched version
    pub max_size: Option<u64>,
    /// `"<subject> (v<version>)"` for the largest version
    pub largest_version: Option<String>,
    /// Schema IDs in fetch order
    pub schema_ids: Vec<i64>,
    /// Fetched versions by schema type
    pub type_counts: BTreeMap<SchemaType, usize>,
    /// Sum of reference counts across fetched versions
    pub total_references: usize,
    /// Fetched versions with at least one reference
    pub versions_with_references: usize,
    /// Failures encountered, one per skipped version (or one listing failure)
    pub errors: Vec<String>,
    /// Cancellation stopped the scan before every version was fetched
    pub interrupted: bool,
}

impl SubjectAnalysis {
    /// An empty analysis for `subject`, classified by name.
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            is_internal: is_internal_subject(subject),
            ..Self::default()
        }
    }

    /// Number of versions that were fetched successfully.
    pub fn fetched_versions(&self) -> usize {
        self.type_counts.values().sum()
    }

    /// Number of listed versions that could not be fetched.
    pub fn failed_versions(&self) -> usize {
        self.version_count.saturating_sub(self.fetched_versions())
    }

    /// Fold one fetched version into the running totals.
    pub fn record_version(&mut self, version: u32, schema: &SchemaRecord) {
        *self
            .type_counts
            .entry(SchemaType::normalize(&schema.schema_type))
            .or_insert(0) += 1;

        self.schema_ids.push(schema.id);

        let size = schema.size();
        self.total_size += size;

        // An empty body is not a meaningful floor.
        if size > 0 && self.min_size.map_or(true, |min| size < min) {
            self.min_size = Some(size);
        }
        if self.max_size.map_or(true, |max| size > max) {
            self.max_size = Some(size);
            self.largest_version = Some(format!("{} (v{})", self.subject, version));
        }

        if !schema.references.is_empty() {
            self.total_references += schema.references.len();
            self.versions_with_references += 1;
        }
    }
}

/// Analyze one subject by fetching all of its versions.
///
/// The token is checked before each version; a cancelled scan stops early
/// and records why.
pub async fn analyze_subject(
    registry: &dyn Registry,
    subject: &str,
    cancel: &CancellationToken,
) -> SubjectAnalysis {
    let mut result = SubjectAnalysis::new(subject);

    let versions = match registry.list_versions(subject, true).await {
        Ok(versions) => versions,
        Err(e) => {
            debug!(subject, error = %e, "listing versions failed");
            result.errors.push(format!("list versions: {}", e));
            return result;
        }
    };

    result.version_count = versions.len();

    for version in versions {
        if cancel.is_cancelled() {
            result
                .errors
                .push(format!("scan cancelled before v{}", version));
            result.interrupted = true;
            break;
        }

        match fetch_version(registry, subject, version).await {
            Ok(schema) => result.record_version(version, &schema),
            Err(e) => result.errors.push(format!("get schema v{}: {}", version, e)),
        }
    }

    result
}

/// Fetch a version, falling back to the deleted-inclusive path.
async fn fetch_version(
    registry: &dyn Registry,
    subject: &str,
    version: u32,
) -> Result<SchemaRecord, String> {
    let first = match registry.get_schema(subject, version).await {
        Ok(schema) => return Ok(schema),
        Err(e) => e,
    };

    debug!(subject, version, error = %first, "retrying fetch including deleted");

    registry
        .get_schema_including_deleted(subject, version, true)
        .await
        .map_err(|second: RegistryError| format!("{}; including deleted: {}", first, second))
}
