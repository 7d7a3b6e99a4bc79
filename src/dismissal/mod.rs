pub mod repository;

use crate::issue::{IssueKey, SeverityLevel};

pub use repository::IssueDismissalRepository;

/// Dismissal state the deduplicator reads and aligns.
///
/// Implementations are not expected to be shared between concurrent callers;
/// mutation goes through `&mut self`.
pub trait DismissalStore {
    /// Whether the issue is currently dismissed, judged at the given severity
    fn is_issue_dismissed(&self, key: &IssueKey, severity: SeverityLevel) -> bool;

    /// Overwrite `to`'s dismissal data with `from`'s
    fn copy_dismissal_data(&mut self, from: &IssueKey, to: &IssueKey);
}
