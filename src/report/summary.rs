use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dismissal::DismissalStore;
use crate::issue::{IssueInfo, IssueKey, SeverityLevel};

/// An issue left visible after deduplication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleIssue {
    /// Short deterministic ID, e.g. "ISSUE-a1b2c3d4"
    pub fingerprint: String,

    pub key: IssueKey,

    pub severity: SeverityLevel,

    pub title: String,

    pub summary: String,

    #[serde(default)]
    pub deduplication_group: Option<String>,

    #[serde(default)]
    pub deduplication_id: Option<String>,

    /// Whether the issue is dismissed, after dismissals were aligned across duplicates
    pub dismissed: bool,
}

impl VisibleIssue {
    pub fn from_issue(issue: &IssueInfo, store: &impl DismissalStore) -> Self {
        VisibleIssue {
            fingerprint: issue.key().fingerprint(),
            key: issue.key().clone(),
            severity: issue.severity(),
            title: issue.issue.title.clone(),
            summary: issue.issue.summary.clone(),
            deduplication_group: issue.deduplication_group().map(str::to_string),
            deduplication_id: issue.deduplication_id().map(str::to_string),
            dismissed: store.is_issue_dismissed(issue.key(), issue.severity()),
        }
    }
}

/// The complete deduplication report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupReport {
    /// issue-dedup version
    pub version: String,

    /// When the deduplication ran
    pub timestamp: String,

    /// Issues file that was processed
    pub input_path: PathBuf,

    /// Entries in the input file
    pub issues_received: usize,

    /// Entries dropped because their source is unknown or static
    pub issues_skipped: usize,

    /// Duplicates collapsed into a higher-priority issue
    pub duplicates_removed: usize,

    /// Surviving issues, in priority order
    pub issues: Vec<VisibleIssue>,

    pub summary: DedupSummary,
}

impl DedupReport {
    /// Check if a visible, non-dismissed issue is at or above a severity threshold
    pub fn has_active_issues_at_or_above(&self, threshold: SeverityLevel) -> bool {
        self.issues
            .iter()
            .any(|i| !i.dismissed && i.severity >= threshold)
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSummary {
    pub total: usize,
    pub dismissed: usize,
    pub critical_warning: usize,
    pub recommendation: usize,
    pub information: usize,
}

impl DedupSummary {
    pub fn from_issues(issues: &[VisibleIssue]) -> Self {
        let mut summary = DedupSummary {
            total: issues.len(),
            ..Default::default()
        };
        for i in issues {
            if i.dismissed {
                summary.dismissed += 1;
            }
            match i.severity {
                SeverityLevel::CriticalWarning => summary.critical_warning += 1,
                SeverityLevel::Recommendation => summary.recommendation += 1,
                SeverityLevel::Information => summary.information += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(severity: SeverityLevel, dismissed: bool) -> VisibleIssue {
        VisibleIssue {
            fingerprint: "ISSUE-00000000".to_string(),
            key: IssueKey::new("s", "i", 0),
            severity,
            title: "t".to_string(),
            summary: String::new(),
            deduplication_group: None,
            deduplication_id: None,
            dismissed,
        }
    }

    #[test]
    fn summary_counts_severities_and_dismissals() {
        let issues = vec![
            visible(SeverityLevel::CriticalWarning, false),
            visible(SeverityLevel::Information, true),
            visible(SeverityLevel::Information, false),
        ];
        let summary = DedupSummary::from_issues(&issues);
        assert_eq!(
            summary,
            DedupSummary {
                total: 3,
                dismissed: 1,
                critical_warning: 1,
                recommendation: 0,
                information: 2,
            }
        );
    }

    #[test]
    fn dismissed_issues_do_not_trip_threshold() {
        let issues = vec![
            visible(SeverityLevel::CriticalWarning, true),
            visible(SeverityLevel::Information, false),
        ];
        let report = DedupReport {
            version: "0".to_string(),
            timestamp: String::new(),
            input_path: PathBuf::from("issues.json"),
            issues_received: 2,
            issues_skipped: 0,
            duplicates_removed: 0,
            summary: DedupSummary::from_issues(&issues),
            issues,
        };
        assert!(!report.has_active_issues_at_or_above(SeverityLevel::Recommendation));
        assert!(report.has_active_issues_at_or_above(SeverityLevel::Information));
    }
}
