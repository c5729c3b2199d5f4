//! stats::aggregate
//!
//! Folds per-subject analyses into registry-wide statistics.
//!
//! # Determinism
//!
//! Analyses arrive in completion order. They are processed sorted by subject
//! name, so the error list is stable, and ranking ties are broken by subject
//! name ascending. Numeric results never depend on input order.

use std::collections::{BTreeSet, HashSet};

use super::analyzer::SubjectAnalysis;
use super::report::{RegistryStats, StatsReport, SubjectSizeInfo, SubjectVersionCount, TOP_N};
use crate::core::types::SchemaType;

/// Aggregate subject analyses into a report.
///
/// `active_subjects` are the names listed without soft-deleted subjects; a
/// non-internal subject that appears there counts as active, every other
/// non-internal subject as deleted.
pub fn aggregate(partials: &[SubjectAnalysis], active_subjects: &[String]) -> StatsReport {
    let active: HashSet<&str> = active_subjects.iter().map(String::as_str).collect();

    let mut ordered: Vec<&SubjectAnalysis> = partials.iter().collect();
    ordered.sort_by(|a, b| a.subject.cmp(&b.subject));

    let mut stats = RegistryStats::default();
    let mut schema_ids = BTreeSet::new();
    let mut errors = Vec::new();
    let mut subjects_with_errors = 0;
    let mut user_subjects = Vec::new();

    for p in ordered {
        if p.is_internal {
            stats.internal_subjects += 1;
            stats.internal_versions += p.version_count;
            continue;
        }

        if !p.errors.is_empty() {
            subjects_with_errors += 1;
            errors.extend(p.errors.iter().map(|e| format!("{}: {}", p.subject, e)));
        }

        stats.total_subjects += 1;
        stats.total_versions += p.version_count;
        stats.failed_versions += p.failed_versions();
        if active.contains(p.subject.as_str()) {
            stats.active_subjects += 1;
            stats.active_versions += p.version_count;
        }

        schema_ids.extend(p.schema_ids.iter().copied());

        for (schema_type, count) in &p.type_counts {
            match schema_type {
                SchemaType::Avro => stats.avro_schemas += count,
                SchemaType::Protobuf => stats.protobuf_schemas += count,
                SchemaType::Json => stats.json_schemas += count,
                SchemaType::Other(_) => stats.other_schemas += count,
            }
        }

        stats.total_schema_size += p.total_size;
        stats.total_references += p.total_references;
        stats.schemas_with_refs += p.versions_with_references;

        if let Some(size) = p.min_size {
            if stats.min_schema_size.map_or(true, |min| size < min) {
                stats.min_schema_size = Some(size);
            }
        }
        if let Some(size) = p.max_size {
            if stats.max_schema_size.map_or(true, |max| size > max) {
                stats.max_schema_size = Some(size);
                stats.largest_schema = p.largest_version.clone();
            }
        }

        user_subjects.push(p);
    }

    stats.deleted_subjects = stats.total_subjects - stats.active_subjects;
    stats.deleted_versions = stats.total_versions - stats.active_versions;

    stats.unique_schema_ids = schema_ids.len();
    stats.min_schema_id = schema_ids.first().copied();
    stats.max_schema_id = schema_ids.last().copied();

    if stats.total_versions > 0 {
        stats.avg_schema_size = stats.total_schema_size as f64 / stats.total_versions as f64;
    }

    stats.top_by_versions = rank_by_versions(&user_subjects);
    stats.top_by_size = rank_by_size(&user_subjects);

    StatsReport {
        stats,
        errors,
        subjects_with_errors,
    }
}

/// Top subjects by version count, descending.
fn rank_by_versions(subjects: &[&SubjectAnalysis]) -> Vec<SubjectVersionCount> {
    let mut ranked: Vec<&SubjectAnalysis> = subjects.to_vec();
    ranked.sort_by(|a, b| {
        b.version_count
            .cmp(&a.version_count)
            .then_with(|| a.subject.cmp(&b.subject))
    });
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|p| SubjectVersionCount {
            subject: p.subject.clone(),
            versions: p.version_count,
        })
        .collect()
}

/// Top subjects by total schema size, descending.
fn rank_by_size(subjects: &[&SubjectAnalysis]) -> Vec<SubjectSizeInfo> {
    let mut ranked: Vec<&SubjectAnalysis> = subjects.to_vec();
    ranked.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then_with(|| a.subject.cmp(&b.subject))
    });
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|p| SubjectSizeInfo {
            subject: p.subject.clone(),
            total_size: p.total_size,
            avg_size: match p.version_count {
                0 => 0,
                n => p.total_size / n as u64,
            },
            version_count: p.version_count,
        })
        .collect()
}
