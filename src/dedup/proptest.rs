//! Property-based tests for the deduplicator.
//!
//! Inputs are generated from a small alphabet of groups and deduplication IDs so
//! that buckets of every size show up, with a random subset of issues dismissed.

use std::collections::HashMap;

use proptest::prelude::*;

use super::test_support::{issue, FakeDismissalStore};
use super::IssueDeduplicator;
use crate::issue::{IssueInfo, IssueKey, SeverityLevel};

#[derive(Debug, Clone)]
struct Spec {
    group: Option<&'static str>,
    dedup_id: Option<&'static str>,
    severity: SeverityLevel,
    dismissed: bool,
}

fn arb_severity() -> impl Strategy<Value = SeverityLevel> {
    prop::sample::select(vec![
        SeverityLevel::Information,
        SeverityLevel::Recommendation,
        SeverityLevel::CriticalWarning,
    ])
}

fn arb_spec() -> impl Strategy<Value = Spec> {
    (
        prop::option::weighted(0.85, prop::sample::select(vec!["g1", "g2"])),
        prop::option::weighted(0.85, prop::sample::select(vec!["1", "2", "3"])),
        arb_severity(),
        prop::bool::weighted(0.3),
    )
        .prop_map(|(group, dedup_id, severity, dismissed)| Spec {
            group,
            dedup_id,
            severity,
            dismissed,
        })
}

/// Issues with unique IDs ("i0", "i1", ...) and a store holding their dismissals
fn build(specs: &[Spec]) -> (Vec<IssueInfo>, FakeDismissalStore) {
    let mut store = FakeDismissalStore::default();
    let issues: Vec<IssueInfo> = specs
        .iter()
        .enumerate()
        .map(|(i, s)| issue(&format!("i{}", i), s.group, s.dedup_id, s.severity))
        .collect();
    for (i, (issue, spec)) in issues.iter().zip(specs).enumerate() {
        if spec.dismissed {
            store.dismiss(issue.key(), i as u32);
        }
    }
    (issues, store)
}

fn dedup_key(issue: &IssueInfo) -> Option<(String, String)> {
    Some((
        issue.deduplication_group()?.to_string(),
        issue.deduplication_id()?.to_string(),
    ))
}

fn position(issue: &IssueInfo) -> usize {
    issue.issue.id[1..].parse().unwrap()
}

proptest! {
    #[test]
    fn one_survivor_per_key_and_all_keyless_survive(specs in prop::collection::vec(arb_spec(), 0..40)) {
        let (mut issues, mut store) = build(&specs);
        let input = issues.clone();

        IssueDeduplicator::new(&mut store).deduplicate_issues(&mut issues);

        let mut survivors: HashMap<(String, String), usize> = HashMap::new();
        let mut keyless = 0;
        for issue in &issues {
            match dedup_key(issue) {
                Some(key) => *survivors.entry(key).or_default() += 1,
                None => keyless += 1,
            }
        }
        prop_assert!(survivors.values().all(|&n| n == 1));

        let input_keys: std::collections::HashSet<_> = input.iter().filter_map(dedup_key).collect();
        prop_assert_eq!(survivors.len(), input_keys.len());
        prop_assert_eq!(keyless, input.iter().filter(|i| dedup_key(i).is_none()).count());
    }

    #[test]
    fn survivors_keep_input_order_and_first_member_wins(specs in prop::collection::vec(arb_spec(), 0..40)) {
        let (mut issues, mut store) = build(&specs);
        let input = issues.clone();

        IssueDeduplicator::new(&mut store).deduplicate_issues(&mut issues);

        let positions: Vec<usize> = issues.iter().map(position).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));

        for survivor in &issues {
            if let Some(key) = dedup_key(survivor) {
                let first = input
                    .iter()
                    .find(|i| dedup_key(i).as_ref() == Some(&key))
                    .unwrap();
                prop_assert_eq!(first.key(), survivor.key());
            }
        }
    }

    #[test]
    fn dismissal_propagates_only_to_equal_or_milder_duplicates(specs in prop::collection::vec(arb_spec(), 0..40)) {
        let (mut issues, mut store) = build(&specs);
        let input = issues.clone();
        let before: HashMap<IssueKey, Option<u32>> =
            input.iter().map(|i| (i.key().clone(), store.data(i.key()))).collect();

        IssueDeduplicator::new(&mut store).deduplicate_issues(&mut issues);

        let mut buckets: HashMap<(String, String), Vec<&IssueInfo>> = HashMap::new();
        for issue in &input {
            if let Some(key) = dedup_key(issue) {
                buckets.entry(key).or_default().push(issue);
            }
        }

        for issue in input.iter().filter(|i| dedup_key(i).is_none()) {
            prop_assert_eq!(store.data(issue.key()), before[issue.key()]);
        }

        for bucket in buckets.values() {
            let source = bucket.iter().find(|i| before[i.key()].is_some());
            for member in bucket {
                let expected = match source {
                    Some(src) if member.severity() <= src.severity() => before[src.key()],
                    _ => before[member.key()],
                };
                prop_assert_eq!(store.data(member.key()), expected);
            }
        }
    }

    #[test]
    fn second_run_is_a_noop(specs in prop::collection::vec(arb_spec(), 0..40)) {
        let (mut issues, mut store) = build(&specs);

        IssueDeduplicator::new(&mut store).deduplicate_issues(&mut issues);
        let once = issues.clone();
        let copies = store.copies().len();

        IssueDeduplicator::new(&mut store).deduplicate_issues(&mut issues);
        prop_assert_eq!(issues, once);
        prop_assert_eq!(store.copies().len(), copies);
    }
}
