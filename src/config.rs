use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::issue::SeverityLevel;
use crate::sources::SafetySourceType;

pub const CONFIG_FILE_NAME: &str = ".issue-dedup.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// issue-dedup configuration (loaded from .issue-dedup.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IssueDedupConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    #[serde(default)]
    pub resurface: ResurfaceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// A safety source that may report issues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,

    #[serde(rename = "type", default)]
    pub source_type: SafetySourceType,

    /// Sources sharing a group have their issues deduplicated together
    #[serde(default)]
    pub deduplication_group: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

/// How long a dismissed issue stays hidden, per severity
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResurfaceConfig {
    #[serde(default)]
    pub information: ResurfacePolicy,

    #[serde(default)]
    pub recommendation: ResurfacePolicy,

    #[serde(default)]
    pub critical_warning: ResurfacePolicy,
}

impl ResurfaceConfig {
    pub fn policy_for(&self, severity: SeverityLevel) -> &ResurfacePolicy {
        match severity {
            SeverityLevel::Information => &self.information,
            SeverityLevel::Recommendation => &self.recommendation,
            SeverityLevel::CriticalWarning => &self.critical_warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResurfacePolicy {
    /// How many times a dismissed issue may come back
    #[serde(default)]
    pub max_count: u32,

    /// Days after a dismissal before the issue comes back
    #[serde(default = "default_delay_days")]
    pub delay_days: u64,
}

impl Default for ResurfacePolicy {
    fn default() -> Self {
        ResurfacePolicy {
            max_count: 0,
            delay_days: default_delay_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Minimum severity to report
    #[serde(default)]
    pub min_severity: Option<SeverityLevel>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: default_format(),
            min_severity: None,
        }
    }
}

fn default_delay_days() -> u64 {
    180
}

fn default_format() -> String {
    "terminal".to_string()
}

impl IssueDedupConfig {
    /// Load a config file that was asked for explicitly
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str::<IssueDedupConfig>(&content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Try to load .issue-dedup.toml from the given directory or its parents
    pub fn discover(start: &Path) -> Option<Self> {
        let config_path = find_config_file(start)?;
        debug!("Found config: {}", config_path.display());

        match Self::load_file(&config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// An explicit path must load; otherwise discover from `start` unless disabled
    pub fn resolve(
        explicit: Option<&Path>,
        no_config: bool,
        start: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if no_config {
            debug!("Config discovery disabled");
            return Ok(Self::default());
        }
        Ok(Self::discover(start).unwrap_or_default())
    }

    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }
}

/// Walk up from `start` to find .issue-dedup.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE_NAME);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# issue-dedup configuration

# Each source that may report issues. Issues from sources sharing a
# deduplication_group and carrying the same deduplication_id are collapsed
# into the highest-priority one.
#
# type: "static" (cannot report issues), "dynamic" or "issue_only"

[[sources]]
id = "lock_screen"
type = "dynamic"
deduplication_group = "device_security"

[[sources]]
id = "device_admin"
type = "issue_only"
deduplication_group = "device_security"

# How dismissed issues come back, per severity.
# An issue dismissed more than max_count times stays dismissed for good.
[resurface.information]
max_count = 0
delay_days = 180

[resurface.recommendation]
max_count = 0
delay_days = 180

[resurface.critical_warning]
max_count = 0
delay_days = 180

[output]
# Default output format: "terminal" or "json"
format = "terminal"

# Minimum severity to report: "INFORMATION", "RECOMMENDATION", "CRITICAL_WARNING"
# min_severity = "INFORMATION"
"#;

/// Create a default .issue-dedup.toml in the current directory
pub fn init_config() -> Result<()> {
    let config_path = std::env::current_dir()?.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE_NAME);
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE_NAME);
    println!("   Declare your sources and their deduplication groups there.");

    Ok(())
}
