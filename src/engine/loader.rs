use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::IssueDedupConfig;
use crate::issue::{IssueInfo, IssueKey, SafetySourceIssue, SafetySourceRef};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read issues from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed issues file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One entry of the input file, in priority order
#[derive(Debug, Clone, Deserialize)]
pub struct ReportedIssue {
    pub source_id: String,

    #[serde(default)]
    pub user_id: u32,

    pub issue: SafetySourceIssue,
}

/// Issues resolved against the configured sources
#[derive(Debug, Default)]
pub struct LoadedIssues {
    pub issues: Vec<IssueInfo>,
    /// Keys of every input entry, skipped ones included
    pub reported_keys: Vec<IssueKey>,
    pub received: usize,
    pub skipped: usize,
}

/// Read the reported issues from a JSON file
pub fn read_issues(path: &Path) -> Result<Vec<ReportedIssue>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Attach each issue to its configured source, keeping input order.
///
/// Issues from unknown sources, or from static sources that cannot report
/// issues, are skipped.
pub fn resolve_issues(reported: Vec<ReportedIssue>, config: &IssueDedupConfig) -> LoadedIssues {
    let received = reported.len();
    let mut issues = Vec::with_capacity(received);
    let mut reported_keys = Vec::with_capacity(received);

    for entry in reported {
        reported_keys.push(IssueKey::new(
            entry.source_id.clone(),
            entry.issue.id.clone(),
            entry.user_id,
        ));

        let Some(source) = config.source(&entry.source_id) else {
            warn!(
                "Skipping issue {}: unknown source '{}'",
                entry.issue.id, entry.source_id
            );
            continue;
        };

        if !source.source_type.is_external() {
            warn!(
                "Skipping issue {}: source '{}' is {} and cannot report issues",
                entry.issue.id, source.id, source.source_type
            );
            continue;
        }

        let source_ref = SafetySourceRef {
            id: source.id.clone(),
            deduplication_group: source.deduplication_group.clone(),
        };
        issues.push(IssueInfo::new(entry.issue, source_ref, entry.user_id));
    }

    let skipped = received - issues.len();
    debug!("Resolved {} of {} issues", issues.len(), received);

    LoadedIssues {
        issues,
        reported_keys,
        received,
        skipped,
    }
}
