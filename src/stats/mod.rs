//! stats
//!
//! The concurrent fetch-and-aggregate pipeline.
//!
//! # Modules
//!
//! - [`analyzer`] - Per-subject analysis with soft-delete fallback
//! - [`scheduler`] - Bounded worker pool over subjects
//! - [`aggregate`] - Fold partial results into registry-wide statistics
//! - [`report`] - Report types handed to presentation
//! - [`pipeline`] - Enumeration, scheduling and aggregation end to end
//!
//! # Data flow
//!
//! ```text
//! list_subjects ──► Scheduler ──► analyze_subject (xN) ──► aggregate ──► StatsReport
//! ```

pub mod aggregate;
pub mod analyzer;
pub mod pipeline;
pub mod report;
pub mod scheduler;

pub use aggregate::aggregate;
pub use analyzer::{analyze_subject, SubjectAnalysis};
pub use pipeline::{collect_stats, StatsError};
pub use report::{ErrorSummary, RegistryStats, StatsReport, SubjectSizeInfo, SubjectVersionCount};
pub use scheduler::{NoProgress, ProgressSink, Scheduler, SchedulerError, DEFAULT_WORKERS};
