mod cli;
mod config;
mod dedup;
mod dismissal;
mod engine;
mod issue;
mod report;
mod sources;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, DedupArgs, DismissArgs, ListSourcesArgs};
use config::IssueDedupConfig;
use engine::Pipeline;
use issue::IssueKey;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("issue_dedup=debug")
    } else if cli.quiet {
        EnvFilter::new("issue_dedup=error")
    } else {
        EnvFilter::new("issue_dedup=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    info!("issue-dedup v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::Dedup(args) => run_dedup(args)?,
        cli::Commands::Dismiss(args) => run_dismiss(args)?,
        cli::Commands::Init => config::init_config()?,
        cli::Commands::ListSources(args) => run_list_sources(args)?,
    }

    Ok(())
}

fn run_dedup(args: &DedupArgs) -> Result<()> {
    let pipeline = Pipeline::new(args)?;
    let mut store = engine::open_store(args.state.as_deref(), pipeline.config(), args.now)?;

    let report = pipeline.run(&mut store)?;

    if let Some(ref path) = args.state {
        store
            .save(path)
            .with_context(|| format!("saving dismissal state {}", path.display()))?;
        info!(
            "Dismissal state for {} issues written to {}",
            store.len(),
            path.display()
        );
    }

    // Output the report
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| pipeline.config().output.format.clone());
    match format.as_str() {
        "json" => {
            let output = report::json::render(&report)?;
            if let Some(ref path) = args.out {
                std::fs::write(path, &output)?;
                info!("Report written to {}", path.display());
            } else {
                println!("{}", output);
            }
        }
        _ => {
            report::terminal::render(&report);
            if let Some(ref path) = args.out {
                let json_output = report::json::render(&report)?;
                std::fs::write(path, &json_output)?;
                info!("JSON report also written to {}", path.display());
            }
        }
    }

    // Exit code based on remaining issues
    if let Some(threshold) = args.fail_on {
        if report.has_active_issues_at_or_above(threshold) {
            std::process::exit(1);
        }
    }

    Ok(())
}

fn run_dismiss(args: &DismissArgs) -> Result<()> {
    // Resurfacing does not matter when only recording a dismissal
    let mut store = engine::open_store(
        Some(args.state.as_path()),
        &IssueDedupConfig::default(),
        args.now,
    )?;

    let key = IssueKey::new(args.source.clone(), args.issue.clone(), args.user);
    store.dismiss_issue(&key);
    store
        .save(&args.state)
        .with_context(|| format!("saving dismissal state {}", args.state.display()))?;

    let count = store.get(&key).map_or(0, |d| d.dismiss_count);
    info!("Dismissed {} ({}), {} times so far", key, key.fingerprint(), count);
    Ok(())
}

fn run_list_sources(args: &ListSourcesArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = IssueDedupConfig::resolve(args.config.as_deref(), false, &cwd)?;
    sources::list_sources(&config);
    Ok(())
}
