pub mod loader;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::DedupArgs;
use crate::config::IssueDedupConfig;
use crate::dedup::IssueDeduplicator;
use crate::dismissal::IssueDismissalRepository;
use crate::issue::SeverityLevel;
use crate::report::summary::{DedupReport, DedupSummary, VisibleIssue};

/// Orchestrates loading, source resolution, deduplication and report
/// generation.
pub struct Pipeline {
    /// Issues file, in priority order
    input_path: PathBuf,
    config: IssueDedupConfig,
    /// Hide survivors below this severity in the report
    min_severity: Option<SeverityLevel>,
}

impl Pipeline {
    pub fn new(args: &DedupArgs) -> Result<Self> {
        let start = args
            .input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let config = IssueDedupConfig::resolve(args.config.as_deref(), args.no_config, start)?;

        info!("Loaded {} sources", config.sources.len());

        let min_severity = args.min_severity.or(config.output.min_severity);

        Ok(Pipeline {
            input_path: args.input.clone(),
            config,
            min_severity,
        })
    }

    pub fn config(&self) -> &IssueDedupConfig {
        &self.config
    }

    /// Run the full pipeline against the given dismissal state
    pub fn run(&self, store: &mut IssueDismissalRepository) -> Result<DedupReport> {
        // Step 1: Read issues
        info!("Reading issues from {}", self.input_path.display());
        let reported = loader::read_issues(&self.input_path)?;

        // Step 2: Resolve sources
        let loaded = loader::resolve_issues(reported, &self.config);
        info!(
            "Received {} issues ({} skipped)",
            loaded.received, loaded.skipped
        );

        // Step 3: Sync dismissal state with what is reported now, skipped
        // issues included
        store.track_issues(&loaded.reported_keys);
        let mut issues = loaded.issues;

        // Step 4: Deduplicate
        let before = issues.len();
        IssueDeduplicator::new(&mut *store).deduplicate_issues(&mut issues);
        let duplicates_removed = before - issues.len();

        info!("Issues after dedup: {}", issues.len());

        // Step 5: Build the report
        let visible: Vec<VisibleIssue> = issues
            .iter()
            .filter(|i| self.min_severity.is_none_or(|min| i.severity() >= min))
            .map(|i| VisibleIssue::from_issue(i, &*store))
            .collect();
        let summary = DedupSummary::from_issues(&visible);

        Ok(DedupReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: store.now().to_rfc3339(),
            input_path: self.input_path.clone(),
            issues_received: loaded.received,
            issues_skipped: loaded.skipped,
            duplicates_removed,
            issues: visible,
            summary,
        })
    }
}

/// Open the dismissal state, or an in-memory one when no path is given
pub fn open_store(
    state: Option<&Path>,
    config: &IssueDedupConfig,
    now: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<IssueDismissalRepository> {
    let resurface = config.resurface.clone();
    let store = match state {
        Some(path) => IssueDismissalRepository::load(path, resurface)
            .with_context(|| format!("opening dismissal state {}", path.display()))?,
        None => IssueDismissalRepository::new(resurface),
    };
    Ok(match now {
        Some(now) => store.with_now(now),
        None => store,
    })
}
