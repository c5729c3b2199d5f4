//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware status lines, byte formatting, tables
//! - [`progress`] - Progress line for subject analysis
//! - [`stats_view`] - Table and JSON rendering of stats reports
//!
//! # Design
//!
//! Reports and status lines go to stdout; warnings, errors and the progress
//! line go to stderr. Diagnostic logging is separate and handled by
//! `tracing`.

pub mod output;
pub mod progress;
pub mod stats_view;
