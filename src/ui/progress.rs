//! ui::progress
//!
//! Single-line progress indicator for subject analysis.
//!
//! Drawn on stderr and only when stderr is a terminal, so piped output and
//! JSON reports stay clean.

use std::io::{IsTerminal, Write};

use crate::stats::ProgressSink;

/// Width of the bar in characters.
const BAR_WIDTH: usize = 40;

/// Progress bar redrawn in place on stderr.
#[derive(Debug, Clone)]
pub struct ProgressLine {
    label: String,
    enabled: bool,
}

impl ProgressLine {
    /// A progress line labelled `label`, enabled when stderr is a terminal.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: std::io::stderr().is_terminal(),
        }
    }

    /// A progress line that draws nothing.
    pub fn hidden() -> Self {
        Self {
            label: String::new(),
            enabled: false,
        }
    }

    fn draw(&self, line: &str) {
        if !self.enabled {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{}", line);
        let _ = stderr.flush();
    }
}

impl ProgressSink for ProgressLine {
    fn started(&self, total: usize) {
        self.draw(&render_progress(&self.label, 0, total));
    }

    fn advanced(&self, completed: usize, total: usize, _subject: &str) {
        self.draw(&render_progress(&self.label, completed, total));
    }

    fn finished(&self) {
        if self.enabled {
            eprintln!();
        }
    }
}

/// Render `label [#####     ] completed/total`.
pub fn render_progress(label: &str, completed: usize, total: usize) -> String {
    let filled = if total == 0 {
        BAR_WIDTH
    } else {
        (completed.min(total) * BAR_WIDTH) / total
    };
    format!(
        "{} [{}{}] {}/{}",
        label,
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        completed,
        total
    )
}
