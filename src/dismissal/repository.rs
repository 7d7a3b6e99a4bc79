use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ResurfaceConfig;
use crate::dismissal::DismissalStore;
use crate::issue::{IssueKey, SeverityLevel};

const STATE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read dismissal state {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write dismissal state {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dismissal state {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(
        "unsupported dismissal state version {found} in {path} (expected {expected})",
        expected = STATE_VERSION
    )]
    Version { path: PathBuf, found: u32 },

    #[error("failed to encode dismissal state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Dismissal bookkeeping for a single issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDismissal {
    pub first_seen_at: DateTime<Utc>,

    #[serde(default)]
    pub dismissed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub dismiss_count: u32,
}

impl IssueDismissal {
    fn new(now: DateTime<Utc>) -> Self {
        IssueDismissal {
            first_seen_at: now,
            dismissed_at: None,
            dismiss_count: 0,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    issues: Vec<StateEntry>,
}

#[derive(Serialize, Deserialize)]
struct StateEntry {
    key: IssueKey,
    #[serde(flatten)]
    dismissal: IssueDismissal,
}

/// In-memory dismissal state with JSON persistence.
///
/// Dismissed issues resurface according to the per-severity policy in
/// [`ResurfaceConfig`].
#[derive(Debug, Clone, Default)]
pub struct IssueDismissalRepository {
    issues: HashMap<IssueKey, IssueDismissal>,
    resurface: ResurfaceConfig,
    now: Option<DateTime<Utc>>,
}

impl IssueDismissalRepository {
    pub fn new(resurface: ResurfaceConfig) -> Self {
        IssueDismissalRepository {
            issues: HashMap::new(),
            resurface,
            now: None,
        }
    }

    /// Pin the clock to a fixed instant
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// The pinned instant, or the current time
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Load state from `path`. A missing file yields an empty repository.
    pub fn load(path: &Path, resurface: ResurfaceConfig) -> Result<Self, StoreError> {
        let mut repo = IssueDismissalRepository::new(resurface);

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No dismissal state at {}, starting empty", path.display());
                return Ok(repo);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let state: StateFile =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if state.version != STATE_VERSION {
            return Err(StoreError::Version {
                path: path.to_path_buf(),
                found: state.version,
            });
        }

        repo.issues = state
            .issues
            .into_iter()
            .map(|entry| (entry.key, entry.dismissal))
            .collect();
        debug!(
            "Loaded {} dismissal entries from {}",
            repo.issues.len(),
            path.display()
        );
        Ok(repo)
    }

    /// Write state to `path` as pretty-printed JSON, entries sorted by key
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let mut issues: Vec<StateEntry> = self
            .issues
            .iter()
            .map(|(key, dismissal)| StateEntry {
                key: key.clone(),
                dismissal: dismissal.clone(),
            })
            .collect();
        issues.sort_by(|a, b| a.key.cmp(&b.key));

        let json = serde_json::to_string_pretty(&StateFile {
            version: STATE_VERSION,
            issues,
        })?;
        std::fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &IssueKey) -> Option<&IssueDismissal> {
        self.issues.get(key)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Sync the repository with the issues currently reported.
    ///
    /// New keys get a fresh entry, keys that are no longer reported are dropped.
    pub fn track_issues<'a>(&mut self, keys: impl IntoIterator<Item = &'a IssueKey>) {
        let now = self.now();
        let current: HashSet<&IssueKey> = keys.into_iter().collect();

        let before = self.issues.len();
        self.issues.retain(|key, _| current.contains(key));
        let dropped = before - self.issues.len();

        for key in current {
            self.issues
                .entry(key.clone())
                .or_insert_with(|| IssueDismissal::new(now));
        }

        if dropped > 0 {
            debug!("Dropped {} dismissal entries for issues no longer reported", dropped);
        }
    }

    /// Record a user dismissal of the issue
    pub fn dismiss_issue(&mut self, key: &IssueKey) {
        let now = self.now();
        let entry = self
            .issues
            .entry(key.clone())
            .or_insert_with(|| IssueDismissal::new(now));
        entry.dismissed_at = Some(now);
        entry.dismiss_count += 1;
        debug!("Dismissed {} (count {})", key, entry.dismiss_count);
    }
}

impl DismissalStore for IssueDismissalRepository {
    fn is_issue_dismissed(&self, key: &IssueKey, severity: SeverityLevel) -> bool {
        let Some(dismissal) = self.issues.get(key) else {
            return false;
        };
        let Some(dismissed_at) = dismissal.dismissed_at else {
            return false;
        };

        let policy = self.resurface.policy_for(severity);
        if dismissal.dismiss_count > policy.max_count {
            return true;
        }

        let Some(delay) = i64::try_from(policy.delay_days)
            .ok()
            .and_then(Duration::try_days)
        else {
            return true;
        };
        self.now() - dismissed_at < delay
    }

    fn copy_dismissal_data(&mut self, from: &IssueKey, to: &IssueKey) {
        let Some(source) = self.issues.get(from) else {
            warn!("Cannot copy dismissal data from unknown issue {}", from);
            return;
        };
        let (dismissed_at, dismiss_count) = (source.dismissed_at, source.dismiss_count);

        let now = self.now();
        let target = self
            .issues
            .entry(to.clone())
            .or_insert_with(|| IssueDismissal::new(now));
        target.dismissed_at = dismissed_at;
        target.dismiss_count = dismiss_count;
    }
}
