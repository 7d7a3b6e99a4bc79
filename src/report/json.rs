use anyhow::Result;
use crate::report::summary::DedupReport;

/// Render a deduplication report as pretty-printed JSON
pub fn render(report: &DedupReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
