//! stats::report
//!
//! The aggregated statistics handed to the presentation layer.
//!
//! Field names serialize in camelCase so JSON output stays compatible with
//! other schema registry tooling.

use serde::Serialize;

/// Number of entries kept in each top-N ranking.
pub const TOP_N: usize = 10;

/// Errors listed in full up to this count.
pub const ERROR_LIST_THRESHOLD: usize = 20;

/// Errors shown when the list is truncated.
pub const ERROR_PREVIEW: usize = 10;

/// Registry-wide statistics.
///
/// Subject and version counts exclude internal subjects, which are tracked
/// in `internal_subjects` / `internal_versions` only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub active_subjects: usize,
    pub deleted_subjects: usize,
    pub total_subjects: usize,
    pub internal_subjects: usize,

    pub active_versions: usize,
    pub deleted_versions: usize,
    pub total_versions: usize,
    pub internal_versions: usize,
    /// Versions counted above whose schema could not be fetched
    pub failed_versions: usize,

    pub unique_schema_ids: usize,
    pub min_schema_id: Option<i64>,
    pub max_schema_id: Option<i64>,

    pub avro_schemas: usize,
    pub protobuf_schemas: usize,
    pub json_schemas: usize,
    /// Fetched versions with a type tag outside the three known formats
    pub other_schemas: usize,

    pub total_schema_size: u64,
    pub avg_schema_size: f64,
    pub min_schema_size: Option<u64>,
    pub max_schema_size: Option<u64>,
    pub largest_schema: Option<String>,

    pub schemas_with_refs: usize,
    pub total_references: usize,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_by_versions: Vec<SubjectVersionCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_by_size: Vec<SubjectSizeInfo>,
}

impl RegistryStats {
    /// Span between the lowest and highest schema ID, inclusive.
    pub fn id_range(&self) -> Option<i64> {
        match (self.min_schema_id, self.max_schema_id) {
            (Some(min), Some(max)) => Some(max - min + 1),
            _ => None,
        }
    }

    /// Fetched versions of the three known types.
    pub fn typed_schemas(&self) -> usize {
        self.avro_schemas + self.protobuf_schemas + self.json_schemas
    }
}

/// Ranking entry by version count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectVersionCount {
    pub subject: String,
    pub versions: usize,
}

/// Ranking entry by total schema size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSizeInfo {
    pub subject: String,
    pub total_size: u64,
    pub avg_size: u64,
    pub version_count: usize,
}

/// Bounded view of the errors collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSummary {
    /// Total number of errors
    pub total: usize,
    /// Number of subjects with at least one error
    pub subjects_with_errors: usize,
    /// Entries to display, formatted `"<subject>: <detail>"`
    pub shown: Vec<String>,
    /// Entries not displayed
    pub hidden: usize,
}

impl ErrorSummary {
    /// Summarize `errors`: all of them up to the threshold, else a preview.
    pub fn new(errors: &[String], subjects_with_errors: usize) -> Self {
        let shown_count = if errors.len() <= ERROR_LIST_THRESHOLD {
            errors.len()
        } else {
            ERROR_PREVIEW
        };
        Self {
            total: errors.len(),
            subjects_with_errors,
            shown: errors[..shown_count].to_vec(),
            hidden: errors.len() - shown_count,
        }
    }

    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Result of a stats run: the statistics and the diagnostics behind them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    pub stats: RegistryStats,
    /// All errors, formatted `"<subject>: <detail>"`, in subject order
    pub errors: Vec<String>,
    pub subjects_with_errors: usize,
}

impl StatsReport {
    /// Bounded error summary for display.
    pub fn error_summary(&self) -> ErrorSummary {
        ErrorSummary::new(&self.errors, self.subjects_with_errors)
    }
}
