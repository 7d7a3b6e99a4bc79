use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Severity level of a safety issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    Information,
    Recommendation,
    CriticalWarning,
}

/// Error returned when a severity string is not one of the known levels
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity level: {0} (expected INFORMATION, RECOMMENDATION or CRITICAL_WARNING)")]
pub struct UnknownSeverity(pub String);

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Information => "INFORMATION",
            SeverityLevel::Recommendation => "RECOMMENDATION",
            SeverityLevel::CriticalWarning => "CRITICAL_WARNING",
        }
    }
}

impl std::str::FromStr for SeverityLevel {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "INFORMATION" | "INFO" => Ok(SeverityLevel::Information),
            "RECOMMENDATION" => Ok(SeverityLevel::Recommendation),
            "CRITICAL_WARNING" | "CRITICAL" => Ok(SeverityLevel::CriticalWarning),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of one issue as reported by one source for one user.
///
/// This is also the unit of dismissal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueKey {
    pub source_id: String,
    pub issue_id: String,
    #[serde(default)]
    pub user_id: u32,
}

impl IssueKey {
    pub fn new(source_id: impl Into<String>, issue_id: impl Into<String>, user_id: u32) -> Self {
        IssueKey {
            source_id: source_id.into(),
            issue_id: issue_id.into(),
            user_id,
        }
    }

    /// Short deterministic ID for display, e.g. "ISSUE-a1b2c3d4"
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.issue_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.user_id.to_le_bytes());
        let result = hasher.finalize();
        let hex = format!("{:x}", result);
        format!("ISSUE-{}", &hex[..8])
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.source_id, self.issue_id, self.user_id)
    }
}

/// An issue as sent by a safety source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySourceIssue {
    /// Source-scoped issue ID
    pub id: String,

    /// Short title
    pub title: String,

    /// Human-readable summary
    #[serde(default)]
    pub summary: String,

    /// Severity level
    pub severity: SeverityLevel,

    /// Issues sharing this ID within one deduplication group are the same problem
    #[serde(default)]
    pub deduplication_id: Option<String>,
}

/// The parts of a source's configuration an issue needs to carry along
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySourceRef {
    pub id: String,
    #[serde(default)]
    pub deduplication_group: Option<String>,
}

/// An issue together with the source that reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueInfo {
    pub issue: SafetySourceIssue,
    pub source: SafetySourceRef,
    key: IssueKey,
}

impl IssueInfo {
    pub fn new(issue: SafetySourceIssue, source: SafetySourceRef, user_id: u32) -> Self {
        let key = IssueKey::new(source.id.clone(), issue.id.clone(), user_id);
        IssueInfo {
            issue,
            source,
            key,
        }
    }

    pub fn key(&self) -> &IssueKey {
        &self.key
    }

    pub fn severity(&self) -> SeverityLevel {
        self.issue.severity
    }

    pub fn deduplication_group(&self) -> Option<&str> {
        self.source.deduplication_group.as_deref()
    }

    pub fn deduplication_id(&self) -> Option<&str> {
        self.issue.deduplication_id.as_deref()
    }
}
