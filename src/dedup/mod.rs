//! Collapses issues that several sources report for the same underlying problem.
//!
//! Issues are duplicates when their sources share a deduplication group and the
//! issues carry the same deduplication ID. Only the highest-priority issue of each
//! such bucket survives, and a dismissal anywhere in the bucket is carried over to
//! the duplicates of equal or lower severity.

#[cfg(test)]
mod proptest;
#[cfg(test)]
pub(crate) mod test_support;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dismissal::DismissalStore;
use crate::issue::{IssueInfo, IssueKey};

/// (deduplication group, deduplication id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DeduplicationKey<'a> {
    group: &'a str,
    id: &'a str,
}

impl<'a> DeduplicationKey<'a> {
    /// None unless both the group and the ID are set
    fn of(issue: &'a IssueInfo) -> Option<Self> {
        Some(DeduplicationKey {
            group: issue.deduplication_group()?,
            id: issue.deduplication_id()?,
        })
    }
}

/// Indices into the sorted input, in input order
type Buckets<'a> = HashMap<DeduplicationKey<'a>, Vec<usize>>;

/// Deduplicates priority-sorted issues against a dismissal store.
///
/// Holds the store mutably for its whole lifetime, so no other caller can touch
/// the same dismissal state while a deduplication is in flight.
pub struct IssueDeduplicator<'s, S: DismissalStore> {
    store: &'s mut S,
}

impl<'s, S: DismissalStore> IssueDeduplicator<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        IssueDeduplicator { store }
    }

    /// Filter duplicates out of `sorted_issues`, which must be sorted by priority.
    ///
    /// The first issue of every duplicate bucket is kept; issues without a
    /// complete deduplication key are never removed. Before filtering, the
    /// dismissal data of each bucket's highest-priority dismissed issue is copied
    /// to every other issue in the bucket with equal or lower severity.
    pub fn deduplicate_issues(&mut self, sorted_issues: &mut Vec<IssueInfo>) {
        let to_filter_out = {
            let buckets = create_dedup_buckets(sorted_issues);
            debug!(
                "Built {} dedup buckets from {} issues",
                buckets.len(),
                sorted_issues.len()
            );

            self.dismiss_duplicates_of_dismissed_issues(sorted_issues, &buckets);
            duplicates_to_filter_out(sorted_issues, &buckets)
        };

        if to_filter_out.is_empty() {
            return;
        }

        let before = sorted_issues.len();
        sorted_issues.retain(|issue| !to_filter_out.contains(issue.key()));
        debug!("Filtered out {} duplicate issues", before - sorted_issues.len());
    }

    fn dismiss_duplicates_of_dismissed_issues(&mut self, issues: &[IssueInfo], buckets: &Buckets) {
        for bucket in buckets.values() {
            if let Some(top_dismissed) = self.highest_priority_dismissed(issues, bucket) {
                self.align_dismissals_within_bucket(issues, top_dismissed, bucket);
            }
        }
    }

    /// First issue of the bucket, in priority order, that is currently dismissed
    fn highest_priority_dismissed<'i>(
        &self,
        issues: &'i [IssueInfo],
        bucket: &[usize],
    ) -> Option<&'i IssueInfo> {
        bucket
            .iter()
            .map(|&i| &issues[i])
            .find(|issue| self.store.is_issue_dismissed(issue.key(), issue.severity()))
    }

    fn align_dismissals_within_bucket(
        &mut self,
        issues: &[IssueInfo],
        top_dismissed: &IssueInfo,
        bucket: &[usize],
    ) {
        let top_key = top_dismissed.key();
        let top_severity = top_dismissed.severity();

        for issue in bucket.iter().map(|&i| &issues[i]) {
            // a more severe duplicate must never be hidden by a milder dismissal
            if issue.key() != top_key && issue.severity() <= top_severity {
                debug!("Aligning dismissal of {} with {}", issue.key(), top_key);
                self.store.copy_dismissal_data(top_key, issue.key());
            }
        }
    }
}

fn create_dedup_buckets(sorted_issues: &[IssueInfo]) -> Buckets<'_> {
    let mut buckets = Buckets::new();
    for (i, issue) in sorted_issues.iter().enumerate() {
        if let Some(key) = DeduplicationKey::of(issue) {
            // single forward pass, so every bucket stays in priority order
            buckets.entry(key).or_default().push(i);
        }
    }
    buckets
}

/// Everything but the head of each bucket
fn duplicates_to_filter_out(issues: &[IssueInfo], buckets: &Buckets) -> HashSet<IssueKey> {
    buckets
        .values()
        .flat_map(|bucket| bucket.iter().skip(1))
        .map(|&i| issues[i].key().clone())
        .collect()
}
