//! cli::commands::stats
//!
//! Collect and display registry statistics.
//!
//! # Example
//!
//! ```bash
//! # Statistics for the default registry
//! srstats stats
//!
//! # With top-10 rankings, as JSON
//! srstats stats --detailed -o json
//! ```

use anyhow::{Context as _, Result};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::Context;
use crate::registry::create_registry;
use crate::stats::{collect_stats, Scheduler, StatsReport};
use crate::ui::output::{self, OutputFormat, Verbosity};
use crate::ui::progress::ProgressLine;
use crate::ui::stats_view::{error_headline, error_lines, render_json, render_report};

/// Run the stats command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn stats(ctx: &Context, workers: Option<usize>, detailed: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(stats_async(ctx, workers, detailed))
}

/// Async implementation of stats.
async fn stats_async(ctx: &Context, workers: Option<usize>, detailed: bool) -> Result<()> {
    let format = ctx.output_format();
    let workers = workers.unwrap_or_else(|| ctx.config.workers());
    let detailed = detailed || ctx.config.detailed();
    // Status lines would corrupt a JSON document on stdout
    let status = match format {
        OutputFormat::Json => Verbosity::Quiet,
        OutputFormat::Table => ctx.verbosity,
    };

    let target = ctx.config.resolve_target(&ctx.overrides)?;
    let registry = create_registry(&target).context("failed to create registry client")?;

    output::header("Schema Registry Statistics", status);
    output::step(format!("Registry: {}", target.url), status);
    output::step(format!("Analyzing schemas with {} workers...", workers), status);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, finishing in-flight requests");
                cancel.cancel();
            }
        })
    };

    let progress = if status.is_quiet() {
        ProgressLine::hidden()
    } else {
        ProgressLine::new("Analyzing")
    };
    let scheduler = Scheduler::new(workers).with_cancellation(cancel);
    let result = collect_stats(registry, &scheduler, &progress).await;
    interrupt.abort();

    let report = result.context("failed to collect statistics")?;
    present(ctx, &report, format, status, detailed)
}

fn present(
    ctx: &Context,
    report: &StatsReport,
    format: OutputFormat,
    status: Verbosity,
    detailed: bool,
) -> Result<()> {
    let stats = &report.stats;

    let summary = report.error_summary();
    if !summary.is_empty() {
        output::warn(error_headline(&summary), ctx.verbosity);
        for line in error_lines(&summary) {
            output::warn_detail(line, ctx.verbosity);
        }
    }

    match format {
        OutputFormat::Json => {
            let json = render_json(stats).context("failed to serialize statistics")?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if stats.total_subjects == 0 {
                output::info(
                    format!(
                        "Registry is empty (excluding {} internal subjects)",
                        stats.internal_subjects
                    ),
                    status,
                );
                return Ok(());
            }
            output::info(
                format!(
                    "Found {} subjects ({} active, {} deleted), excluding {} internal subjects",
                    stats.total_subjects,
                    stats.active_subjects,
                    stats.deleted_subjects,
                    stats.internal_subjects
                ),
                status,
            );
            print!("{}", render_report(report, detailed));
        }
    }

    Ok(())
}
