//! cli
//!
//! Command-line interface layer for srstats.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and report its warnings
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers resolve a registry through
//! [`crate::core::config`] and [`crate::registry::create_registry`], run the
//! library code on a tokio runtime, and render results through [`crate::ui`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::{Config, ConnectionOverrides};
use crate::ui::output::{self, OutputFormat, Verbosity};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Connection flags
    pub overrides: ConnectionOverrides,
    /// `--output`, if given
    pub output: Option<OutputFormat>,
    /// Loaded configuration
    pub config: Config,
}

impl Context {
    /// Output format from the flag, else the config default.
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_else(|| self.config.default_output())
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load().context("failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    if let Some(path) = loaded.config.loaded_from() {
        output::debug(format!("config loaded from {}", path.display()), verbosity);
    }

    let ctx = Context {
        verbosity,
        overrides: cli.connection_overrides(),
        output: cli.output,
        config: loaded.config,
    };

    commands::dispatch(cli.command, &ctx)
}
