//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Status lines respect the quiet flag; errors are always shown. Reports
//! are rendered to strings first so they can be tested without capturing
//! stdout. With `--output json` the report is the only thing on stdout.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Whether status lines should be printed.
    pub fn is_quiet(&self) -> bool {
        *self == Verbosity::Quiet
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Accepted format names.
    pub const NAMES: &'static [&'static str] = &["table", "json"];

    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// The format name.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Width of the rule under a header.
const HEADER_RULE_WIDTH: usize = 50;

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("{}", message);
    }
}

/// Print a section header (respects quiet mode).
pub fn header(title: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("\n{}", title);
        println!("{}", "─".repeat(HEADER_RULE_WIDTH));
    }
}

/// Print a step in progress (respects quiet mode).
pub fn step(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("→ {}", message);
    }
}

/// Print an informational line (respects quiet mode).
pub fn info(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("  {}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("warning: {}", message);
    }
}

/// Print a continuation line under a warning (respects quiet mode).
pub fn warn_detail(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("{}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("✓ {}", message);
    }
}

/// Format a byte count with binary units.
///
/// Counts under 1024 are shown exactly (`"512 B"`), larger ones with one
/// decimal (`"1.5 KB"`, `"3.0 MB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Format `part` as a percentage of `whole` with one decimal.
///
/// A zero `whole` yields `"0.0%"`.
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

/// Render a left-aligned plain-text table.
///
/// Headers are upper-cased and underlined; columns are separated by two
/// spaces. Returns an empty string when there are no rows.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rules, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if i < last {
            let pad = widths[i].saturating_sub(cell.chars().count()) + 2;
            out.push_str(&" ".repeat(pad));
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), None);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    mod bytes {
        use super::*;

        #[test]
        fn under_one_kilobyte() {
            assert_eq!(format_bytes(0), "0 B");
            assert_eq!(format_bytes(1023), "1023 B");
        }

        #[test]
        fn binary_units() {
            assert_eq!(format_bytes(1024), "1.0 KB");
            assert_eq!(format_bytes(1536), "1.5 KB");
            assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
            assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
        }

        #[test]
        fn largest_values() {
            assert_eq!(format_bytes(1 << 60), "1.0 EB");
            assert!(format_bytes(u64::MAX).ends_with(" EB"));
        }
    }

    #[test]
    fn percent_guards_zero() {
        assert_eq!(format_percent(0, 0), "0.0%");
        assert_eq!(format_percent(1, 3), "33.3%");
        assert_eq!(format_percent(2, 2), "100.0%");
    }

    mod table {
        use super::*;

        #[test]
        fn aligns_columns() {
            let rendered = render_table(
                &["Metric", "Value"],
                &[
                    vec!["Unique Schema IDs".into(), "3".into()],
                    vec!["Min".into(), "10".into()],
                ],
            );
            let lines: Vec<&str> = rendered.lines().collect();
            assert_eq!(lines[0], "METRIC             VALUE");
            assert_eq!(lines[1], "-----------------  -----");
            assert_eq!(lines[2], "Unique Schema IDs  3");
            assert_eq!(lines[3], "Min                10");
        }

        #[test]
        fn empty_rows_render_nothing() {
            assert_eq!(render_table(&["Subject", "Versions"], &[]), "");
        }

        #[test]
        fn counts_characters_not_bytes() {
            let rendered = render_table(&["A", "B"], &[vec!["é".into(), "x".into()]]);
            assert_eq!(rendered.lines().nth(2), Some("é  x"));
        }
    }
}
