use owo_colors::OwoColorize;

use crate::issue::SeverityLevel;
use crate::report::summary::DedupReport;

/// Render a deduplication report to the terminal with colors
pub fn render(report: &DedupReport) {
    println!();
    println!(
        "{}  issue-dedup v{} — {} issues from {}",
        "🛡".bold(),
        report.version,
        report.issues_received,
        report.input_path.display()
    );
    println!();

    if report.issues.is_empty() {
        println!("  {}  No issues to show!", "✅".bold());
        println!();
        return;
    }

    for issue in &report.issues {
        let severity_display = format!(" {} ", issue.severity);
        let severity_colored = match issue.severity {
            SeverityLevel::CriticalWarning => severity_display.on_red().white().bold().to_string(),
            SeverityLevel::Recommendation => {
                severity_display.on_yellow().black().bold().to_string()
            }
            SeverityLevel::Information => severity_display.on_blue().white().to_string(),
        };

        let title = if issue.dismissed {
            format!("{} (dismissed)", issue.title).dimmed().to_string()
        } else {
            issue.title.bold().to_string()
        };

        println!(
            "  {}  {}  {}",
            severity_colored,
            issue.fingerprint.dimmed(),
            issue.key.to_string().dimmed(),
        );
        println!("           {}", title);

        let summary = issue.summary.trim();
        if !summary.is_empty() {
            for line in summary.lines().take(3) {
                println!("           → {}", line.dimmed());
            }
        }

        if let (Some(group), Some(id)) = (&issue.deduplication_group, &issue.deduplication_id) {
            println!(
                "           {} {}",
                "⮕".green(),
                format!("dedup {}:{}", group, id).green()
            );
        }
        println!();
    }

    // Summary bar
    println!("{}", "━".repeat(60));

    let mut summary_parts = Vec::new();
    if report.summary.critical_warning > 0 {
        summary_parts.push(
            format!("{} critical", report.summary.critical_warning)
                .red()
                .bold()
                .to_string(),
        );
    }
    if report.summary.recommendation > 0 {
        summary_parts.push(
            format!("{} recommended", report.summary.recommendation)
                .yellow()
                .bold()
                .to_string(),
        );
    }
    if report.summary.information > 0 {
        summary_parts.push(
            format!("{} info", report.summary.information)
                .blue()
                .to_string(),
        );
    }

    println!(
        " Showing {} issues: {}",
        report.summary.total.to_string().bold(),
        summary_parts.join(", ")
    );

    if report.summary.dismissed > 0 {
        println!(
            " ({} dismissed)",
            report.summary.dismissed.to_string().dimmed()
        );
    }
    if report.duplicates_removed > 0 || report.issues_skipped > 0 {
        println!(
            " ({} duplicates collapsed, {} skipped)",
            report.duplicates_removed.to_string().dimmed(),
            report.issues_skipped.to_string().dimmed()
        );
    }

    println!("{}", "━".repeat(60));
    println!();
}
