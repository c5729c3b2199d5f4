//! ui::stats_view
//!
//! Rendering of a stats report as tables or JSON.

use std::fmt::Write;

use super::output::{format_bytes, format_percent, render_table};
use crate::stats::{ErrorSummary, RegistryStats, StatsReport};

/// Placeholder for values that were never observed.
const MISSING: &str = "-";

/// Render the report as plain-text tables.
///
/// Rankings are included only when `detailed` is set.
pub fn render_report(report: &StatsReport, detailed: bool) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    section(&mut out, "Subject Statistics");
    out.push_str(&render_table(
        &["Metric", "Active", "Deleted", "Total"],
        &[
            vec![
                "Subjects".into(),
                stats.active_subjects.to_string(),
                stats.deleted_subjects.to_string(),
                stats.total_subjects.to_string(),
            ],
            vec![
                "Schema Versions".into(),
                stats.active_versions.to_string(),
                stats.deleted_versions.to_string(),
                stats.total_versions.to_string(),
            ],
        ],
    ));
    let _ = writeln!(
        out,
        "(Excluding {} internal subjects with {} versions)",
        stats.internal_subjects, stats.internal_versions
    );
    if stats.failed_versions > 0 {
        let _ = writeln!(
            out,
            "({} versions could not be fetched and are missing from the metrics below)",
            stats.failed_versions
        );
    }

    section(&mut out, "Schema ID Statistics");
    out.push_str(&render_table(
        &["Metric", "Value"],
        &[
            vec!["Unique Schema IDs".into(), stats.unique_schema_ids.to_string()],
            vec!["Min Schema ID".into(), or_missing(stats.min_schema_id)],
            vec!["Max Schema ID".into(), or_missing(stats.max_schema_id)],
            vec!["ID Range".into(), or_missing(stats.id_range())],
        ],
    ));

    section(&mut out, "Schema Type Distribution");
    out.push_str(&render_table(&["Type", "Count", "Percentage"], &type_rows(stats)));

    section(&mut out, "Size Metrics");
    out.push_str(&render_table(
        &["Metric", "Value"],
        &[
            vec![
                "Total Schema Size".into(),
                format_bytes(stats.total_schema_size),
            ],
            vec![
                "Average Schema Size".into(),
                format_bytes(stats.avg_schema_size as u64),
            ],
            vec![
                "Min Schema Size".into(),
                stats.min_schema_size.map_or(MISSING.into(), format_bytes),
            ],
            vec![
                "Max Schema Size".into(),
                stats.max_schema_size.map_or(MISSING.into(), format_bytes),
            ],
            vec![
                "Largest Schema".into(),
                stats.largest_schema.clone().unwrap_or_else(|| MISSING.into()),
            ],
        ],
    ));

    section(&mut out, "Reference Statistics");
    out.push_str(&render_table(
        &["Metric", "Value"],
        &[
            vec![
                "Schema Versions with References".into(),
                stats.schemas_with_refs.to_string(),
            ],
            vec!["Total References".into(), stats.total_references.to_string()],
        ],
    ));

    if detailed {
        render_rankings(&mut out, stats);
    }

    out
}

fn render_rankings(out: &mut String, stats: &RegistryStats) {
    section(out, "Top 10 Subjects by Version Count");
    let rows: Vec<Vec<String>> = stats
        .top_by_versions
        .iter()
        .map(|s| vec![s.subject.clone(), s.versions.to_string()])
        .collect();
    out.push_str(&render_table(&["Subject", "Versions"], &rows));

    section(out, "Top 10 Subjects by Total Size");
    let rows: Vec<Vec<String>> = stats
        .top_by_size
        .iter()
        .map(|s| {
            vec![
                s.subject.clone(),
                format_bytes(s.total_size),
                format_bytes(s.avg_size),
                s.version_count.to_string(),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["Subject", "Total Size", "Avg Size", "Versions"],
        &rows,
    ));
}

fn type_rows(stats: &RegistryStats) -> Vec<Vec<String>> {
    let whole = stats.typed_schemas() + stats.other_schemas;
    let mut rows: Vec<Vec<String>> = [
        ("AVRO", stats.avro_schemas),
        ("PROTOBUF", stats.protobuf_schemas),
        ("JSON", stats.json_schemas),
    ]
    .iter()
    .map(|(name, count)| {
        vec![
            name.to_string(),
            count.to_string(),
            format_percent(*count, whole),
        ]
    })
    .collect();
    if stats.other_schemas > 0 {
        rows.push(vec![
            "OTHER".into(),
            stats.other_schemas.to_string(),
            format_percent(stats.other_schemas, whole),
        ]);
    }
    rows
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or(MISSING.into(), |v| v.to_string())
}

/// Render the statistics as pretty-printed JSON.
pub fn render_json(stats: &RegistryStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

/// Headline for an error summary.
pub fn error_headline(summary: &ErrorSummary) -> String {
    format!(
        "encountered {} errors across {} subjects",
        summary.total, summary.subjects_with_errors
    )
}

/// Detail lines for an error summary, ending with a count of hidden entries.
pub fn error_lines(summary: &ErrorSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary.shown.iter().map(|e| format!("  {}", e)).collect();
    if summary.hidden > 0 {
        lines.push(format!("  ... and {} more errors", summary.hidden));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{SubjectSizeInfo, SubjectVersionCount};

    fn sample() -> StatsReport {
        StatsReport {
            stats: RegistryStats {
                active_subjects: 1,
                total_subjects: 1,
                internal_subjects: 1,
                internal_versions: 1,
                active_versions: 2,
                total_versions: 2,
                unique_schema_ids: 2,
                min_schema_id: Some(1),
                max_schema_id: Some(2),
                avro_schemas: 2,
                total_schema_size: 400,
                avg_schema_size: 200.0,
                min_schema_size: Some(100),
                max_schema_size: Some(300),
                largest_schema: Some("orders (v2)".into()),
                top_by_versions: vec![SubjectVersionCount {
                    subject: "orders".into(),
                    versions: 2,
                }],
                top_by_size: vec![SubjectSizeInfo {
                    subject: "orders".into(),
                    total_size: 400,
                    avg_size: 200,
                    version_count: 2,
                }],
                ..RegistryStats::default()
            },
            ..StatsReport::default()
        }
    }

    #[test]
    fn table_sections_present() {
        let text = render_report(&sample(), false);
        for title in [
            "Subject Statistics",
            "Schema ID Statistics",
            "Schema Type Distribution",
            "Size Metrics",
            "Reference Statistics",
        ] {
            assert!(text.contains(title), "missing section {title}");
        }
        assert!(text.contains("(Excluding 1 internal subjects with 1 versions)"));
        assert!(text.contains("orders (v2)"));
        assert!(text.contains("100.0%"));
        assert!(!text.contains("Top 10"));
        assert!(!text.contains("could not be fetched"));
    }

    #[test]
    fn detailed_adds_rankings() {
        let text = render_report(&sample(), true);
        assert!(text.contains("Top 10 Subjects by Version Count"));
        assert!(text.contains("Top 10 Subjects by Total Size"));
        assert!(text.contains("200 B"));
    }

    #[test]
    fn unset_values_render_as_dash() {
        let text = render_report(&StatsReport::default(), false);
        assert!(text.contains("Min Schema ID      -"));
        assert!(text.contains("Largest Schema       -"));
        assert!(text.contains("0.0%"));
        assert!(!text.contains("OTHER"));
    }

    #[test]
    fn failed_versions_called_out() {
        let mut report = sample();
        report.stats.failed_versions = 3;
        report.stats.other_schemas = 1;
        let text = render_report(&report, false);
        assert!(text.contains("(3 versions could not be fetched"));
        assert!(text.contains("OTHER"));
    }

    #[test]
    fn json_round_trips_keys() {
        let json = render_json(&sample().stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalSubjects"], 1);
        assert_eq!(value["largestSchema"], "orders (v2)");
        assert_eq!(value["topByVersions"][0]["subject"], "orders");
        assert_eq!(value["topBySize"][0]["avgSize"], 200);
    }

    #[test]
    fn error_lines_truncate() {
        let errors: Vec<String> = (0..25).map(|i| format!("s{}: boom", i)).collect();
        let summary = ErrorSummary::new(&errors, 25);

        assert_eq!(
            error_headline(&summary),
            "encountered 25 errors across 25 subjects"
        );
        let lines = error_lines(&summary);
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "  s0: boom");
        assert_eq!(lines[10], "  ... and 15 more errors");
    }
}
