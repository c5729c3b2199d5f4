//! cli::commands::health
//!
//! Check connectivity and report registry-wide settings.
//!
//! Listing subjects is the connectivity probe and must succeed. Mode,
//! compatibility level and contexts are best-effort: registries that do not
//! expose them (or deny access) still pass the check.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tracing::debug;

use crate::cli::Context;
use crate::registry::{create_registry, Registry, RegistryError};
use crate::ui::output::{self, OutputFormat};

/// Findings of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Registry URL that was checked
    pub url: String,
    /// Number of active subjects
    pub subjects: usize,
    /// Registry-wide mode, if readable
    pub mode: Option<String>,
    /// Registry-wide compatibility level, if readable
    pub compatibility: Option<String>,
    /// Number of schema contexts, if listable
    pub contexts: Option<usize>,
}

/// Probe `registry` sequentially.
///
/// # Errors
///
/// Returns the subject listing error; every other failure is recorded as a
/// missing value.
pub async fn check_health(registry: &dyn Registry, url: &str) -> Result<HealthReport, RegistryError> {
    let subjects = registry.list_subjects(false).await?;

    let mode = registry
        .get_mode()
        .await
        .map_err(|e| debug!(error = %e, "mode unavailable"))
        .ok();
    let compatibility = registry
        .get_compatibility()
        .await
        .map_err(|e| debug!(error = %e, "compatibility unavailable"))
        .ok();
    let contexts = registry
        .list_contexts()
        .await
        .map_err(|e| debug!(error = %e, "contexts unavailable"))
        .ok()
        .map(|c| c.len());

    Ok(HealthReport {
        url: url.to_string(),
        subjects: subjects.len(),
        mode,
        compatibility,
        contexts,
    })
}

/// Run the health command.
pub fn health(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(health_async(ctx))
}

async fn health_async(ctx: &Context) -> Result<()> {
    let format = ctx.output_format();
    let v = match format {
        OutputFormat::Json => output::Verbosity::Quiet,
        OutputFormat::Table => ctx.verbosity,
    };

    output::header("Schema Registry Health Check", v);

    let target = ctx.config.resolve_target(&ctx.overrides)?;
    let registry = create_registry(&target).context("failed to create registry client")?;

    output::step("Checking connectivity...", v);
    let report = check_health(registry.as_ref(), &target.url)
        .await
        .context("registry API error")?;

    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&report)
            .context("failed to serialize health report")?;
        println!("{}", json);
        return Ok(());
    }

    output::success("Connection successful", v);
    output::info(format!("Registry URL: {}", report.url), v);
    output::info(format!("Subjects found: {}", report.subjects), v);
    if let Some(mode) = &report.mode {
        output::info(format!("Mode: {}", mode), v);
    }
    if let Some(level) = &report.compatibility {
        output::info(format!("Compatibility: {}", level), v);
    }
    if let Some(count) = report.contexts {
        output::info(format!("Contexts: {}", count), v);
    }
    output::success("All health checks passed", v);

    Ok(())
}
