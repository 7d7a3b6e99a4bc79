use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::path::PathBuf;

use crate::issue::SeverityLevel;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collapse duplicate issues and align their dismissals
    Dedup(DedupArgs),

    /// Mark an issue as dismissed in a dismissal state file
    Dismiss(DismissArgs),

    /// Initialize an .issue-dedup.toml config file in the current directory
    Init,

    /// List the configured safety sources
    ListSources(ListSourcesArgs),
}

#[derive(clap::Args, Debug)]
pub struct DedupArgs {
    /// JSON file of reported issues, highest priority first
    pub input: PathBuf,

    /// Dismissal state file (read, aligned and written back)
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Output format: "terminal" or "json" (defaults to the config value)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write report to file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Config file to use instead of searching for .issue-dedup.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not search for a config file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Evaluate dismissals as of this instant (RFC 3339)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Fail (exit code 1) if a non-dismissed issue at or above this severity remains.
    /// Values: CRITICAL_WARNING, RECOMMENDATION, INFORMATION
    #[arg(long)]
    pub fail_on: Option<SeverityLevel>,

    /// Only report issues at or above this severity
    #[arg(long)]
    pub min_severity: Option<SeverityLevel>,
}

#[derive(clap::Args, Debug)]
pub struct DismissArgs {
    /// Dismissal state file
    #[arg(short, long)]
    pub state: PathBuf,

    /// Source that reported the issue
    #[arg(long)]
    pub source: String,

    /// Issue ID within the source
    #[arg(long)]
    pub issue: String,

    /// User the issue was reported for
    #[arg(long, default_value = "0")]
    pub user: u32,

    /// Record the dismissal at this instant (RFC 3339)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(clap::Args, Debug)]
pub struct ListSourcesArgs {
    /// Config file to use instead of searching for .issue-dedup.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
