use std::cell::Cell;
use std::collections::HashMap;

use crate::dismissal::DismissalStore;
use crate::issue::{IssueInfo, IssueKey, SafetySourceIssue, SafetySourceRef, SeverityLevel};

/// Issue from a source named after the group (or "ungrouped")
pub fn issue(
    id: &str,
    group: Option<&str>,
    dedup_id: Option<&str>,
    severity: SeverityLevel,
) -> IssueInfo {
    IssueInfo::new(
        SafetySourceIssue {
            id: id.to_string(),
            title: format!("Issue {}", id),
            summary: String::new(),
            severity,
            deduplication_id: dedup_id.map(str::to_string),
        },
        SafetySourceRef {
            id: group.unwrap_or("ungrouped").to_string(),
            deduplication_group: group.map(str::to_string),
        },
        0,
    )
}

/// Dismissal store that keeps an opaque token per dismissed issue and records
/// every call made to it.
#[derive(Debug, Default)]
pub struct FakeDismissalStore {
    dismissed: HashMap<IssueKey, u32>,
    copies: Vec<(IssueKey, IssueKey)>,
    queries: Cell<usize>,
}

impl FakeDismissalStore {
    pub fn dismiss(&mut self, key: &IssueKey, token: u32) {
        self.dismissed.insert(key.clone(), token);
    }

    pub fn data(&self, key: &IssueKey) -> Option<u32> {
        self.dismissed.get(key).copied()
    }

    pub fn copies(&self) -> &[(IssueKey, IssueKey)] {
        &self.copies
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl DismissalStore for FakeDismissalStore {
    fn is_issue_dismissed(&self, key: &IssueKey, _severity: SeverityLevel) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.dismissed.contains_key(key)
    }

    fn copy_dismissal_data(&mut self, from: &IssueKey, to: &IssueKey) {
        self.copies.push((from.clone(), to.clone()));
        match self.dismissed.get(from).copied() {
            Some(token) => {
                self.dismissed.insert(to.clone(), token);
            }
            None => {
                self.dismissed.remove(to);
            }
        }
    }
}
