//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--url` / `-u`: Registry URL
//! - `--username`, `--password`: Basic auth credentials
//! - `--registry` / `-r`: Named registry from the config file
//! - `--context` / `-c`: Schema context
//! - `--output` / `-o`: Output format (table, json)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};

use crate::core::config::ConnectionOverrides;
use crate::ui::output::OutputFormat;

/// srstats - Statistics for Confluent-compatible schema registries
#[derive(Parser, Debug)]
#[command(name = "srstats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Schema registry URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Basic auth username or API key
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Basic auth password or API secret
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Named registry from the config file
    #[arg(short = 'r', long, global = true, value_name = "NAME")]
    pub registry: Option<String>,

    /// Schema context
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output format: table or json
    #[arg(short = 'o', long, global = true, value_parser = parse_output_format)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Connection settings given on the command line.
    pub fn connection_overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            url: self.url.clone(),
            registry: self.registry.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            context: self.context.clone(),
        }
    }
}

fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| {
        format!(
            "unknown format '{}', expected one of: {}",
            s,
            OutputFormat::NAMES.join(", ")
        )
    })
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show registry statistics
    #[command(
        name = "stats",
        long_about = "Collect statistics about the schema registry.\n\n\
            Enumerates every subject (including soft-deleted ones), fetches every \
            schema version in parallel, and reports subject and version counts, \
            schema ID ranges, type distribution, size metrics and reference counts. \
            Internal ksqlDB subjects (_confluent-ksql-*) are counted separately.",
        after_help = "\
EXAMPLES:
    # Statistics for the default registry
    srstats stats

    # Include top-10 rankings by version count and size
    srstats stats --detailed

    # More parallelism against a large registry
    srstats stats --workers 50

    # Machine-readable output
    srstats stats -o json"
    )]
    Stats {
        /// Number of concurrent workers [default: 20]
        #[arg(short, long)]
        workers: Option<usize>,

        /// Show top subjects by version count and size
        #[arg(long)]
        detailed: bool,
    },

    /// Check connectivity and registry settings
    #[command(
        name = "health",
        after_help = "\
EXAMPLES:
    # Check the default registry
    srstats health

    # Check a named registry
    srstats health --registry prod"
    )]
    Health,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    srstats completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    srstats completion zsh >> ~/.zshrc

    # Fish
    srstats completion fish > ~/.config/fish/completions/srstats.fish

    # PowerShell
    srstats completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "srstats",
            "stats",
            "--url",
            "http://localhost:8081",
            "-o",
            "json",
            "--workers",
            "4",
            "--detailed",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Command::Stats { workers, detailed } => {
                assert_eq!(workers, Some(4));
                assert!(detailed);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_output_rejected() {
        let result = Cli::try_parse_from(["srstats", "-o", "yaml", "health"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_collect_connection_flags() {
        let cli = Cli::try_parse_from([
            "srstats",
            "-r",
            "prod",
            "--username",
            "key",
            "--password",
            "secret",
            "-c",
            ".team",
            "health",
        ])
        .unwrap();

        let overrides = cli.connection_overrides();
        assert_eq!(overrides.registry.as_deref(), Some("prod"));
        assert_eq!(overrides.username.as_deref(), Some("key"));
        assert_eq!(overrides.password.as_deref(), Some("secret"));
        assert_eq!(overrides.context.as_deref(), Some(".team"));
        assert!(overrides.url.is_none());
    }

    #[test]
    fn completion_requires_shell() {
        assert!(Cli::try_parse_from(["srstats", "completion"]).is_err());
        assert!(Cli::try_parse_from(["srstats", "completion", "zsh"]).is_ok());
    }
}
