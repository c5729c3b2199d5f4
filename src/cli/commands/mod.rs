//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves the registry connection from flags and configuration
//! 2. Runs library code on a tokio runtime
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Registry commands (stats, health) are async because they involve network
//! I/O. Handlers are synchronous wrappers that build a runtime and
//! `block_on` the async implementation.

mod completion;
mod health;
mod stats;

// Re-export command functions for testing and direct invocation
pub use completion::{completion, write_completion};
pub use health::{check_health, health, HealthReport};
pub use stats::stats;

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Stats { workers, detailed } => stats(ctx, workers, detailed),
        Command::Health => health(ctx),
        Command::Completion { shell } => completion(shell),
    }
}
