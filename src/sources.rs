use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};

use crate::config::IssueDedupConfig;

/// How a safety source provides its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetySourceType {
    /// Fixed entry, never reports issues
    Static,
    #[default]
    Dynamic,
    IssueOnly,
}

impl SafetySourceType {
    /// Whether issue data can be provided for a source of this type
    pub fn is_external(&self) -> bool {
        match self {
            SafetySourceType::Static => false,
            SafetySourceType::Dynamic | SafetySourceType::IssueOnly => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetySourceType::Static => "static",
            SafetySourceType::Dynamic => "dynamic",
            SafetySourceType::IssueOnly => "issue_only",
        }
    }
}

impl std::fmt::Display for SafetySourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render the configured sources as a table
pub fn sources_table(config: &IssueDedupConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Source", "Type", "External", "Dedup group", "Title"]);

    for source in &config.sources {
        table.add_row(vec![
            source.id.clone(),
            source.source_type.to_string(),
            if source.source_type.is_external() { "yes" } else { "no" }.to_string(),
            source.deduplication_group.clone().unwrap_or_else(|| "-".to_string()),
            source.title.clone().unwrap_or_default(),
        ]);
    }

    table
}

/// List all configured safety sources
pub fn list_sources(config: &IssueDedupConfig) {
    println!();
    println!("🛡  issue-dedup — Configured Safety Sources");
    println!("{}", "━".repeat(55));
    println!();

    if config.sources.is_empty() {
        println!("  No sources configured.");
        println!("  Run `issue-dedup init` to create a config file");
        println!();
        return;
    }

    println!("{}", sources_table(config));
    println!();

    let groups: std::collections::BTreeSet<&str> = config
        .sources
        .iter()
        .filter_map(|s| s.deduplication_group.as_deref())
        .collect();
    println!(
        "  {} sources, {} deduplication groups",
        config.sources.len(),
        groups.len()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;

    #[test]
    fn only_static_sources_are_internal() {
        assert!(!SafetySourceType::Static.is_external());
        assert!(SafetySourceType::Dynamic.is_external());
        assert!(SafetySourceType::IssueOnly.is_external());
    }

    #[test]
    fn table_lists_every_source() {
        let config = IssueDedupConfig {
            sources: vec![
                SourceConfig {
                    id: "lock_screen".to_string(),
                    source_type: SafetySourceType::Dynamic,
                    deduplication_group: Some("device_security".to_string()),
                    title: Some("Screen lock".to_string()),
                },
                SourceConfig {
                    id: "about".to_string(),
                    source_type: SafetySourceType::Static,
                    deduplication_group: None,
                    title: None,
                },
            ],
            ..Default::default()
        };

        let rendered = sources_table(&config).to_string();
        assert!(rendered.contains("lock_screen"));
        assert!(rendered.contains("device_security"));
        assert!(rendered.contains("static"));
    }
}
