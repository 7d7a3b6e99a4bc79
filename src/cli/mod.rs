pub mod commands;

use clap::Parser;

pub use commands::{Commands, DedupArgs, DismissArgs, ListSourcesArgs};

/// issue-dedup — Safety issue deduplicator
///
/// Collapses issues that several sources report for the same problem,
/// keeping the highest-priority one and carrying dismissals across duplicates.
#[derive(Parser, Debug)]
#[command(
    name = "issue-dedup",
    version,
    about = "🛡 issue-dedup — Collapse duplicate safety issues",
    long_about = "issue-dedup reads a priority-ordered list of safety issues and collapses the ones\nthat sources in the same deduplication group report for the same problem.\n\nDismissing any duplicate dismisses the milder ones too."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
