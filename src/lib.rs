//! srstats - Statistics for Confluent-compatible schema registries
//!
//! srstats enumerates every subject in a schema registry, fetches every
//! schema version in parallel, and reports subject and version counts,
//! schema ID ranges, type distribution, size metrics, reference counts and
//! top-N rankings.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, dispatches)
//! - [`stats`] - Concurrent fetch-and-aggregate pipeline
//! - [`registry`] - Registry trait, HTTP and mock implementations
//! - [`core`] - Domain types and configuration
//! - [`ui`] - Output formatting and progress display
//!
//! # Guarantees
//!
//! 1. Every enumerated subject is analyzed exactly once
//! 2. One failing version never aborts its subject; one failing subject never aborts the run
//! 3. Internal subjects are counted separately and excluded from every other statistic
//! 4. Numeric results do not depend on the order in which subjects finish

pub mod cli;
pub mod core;
pub mod registry;
pub mod stats;
pub mod ui;
