//! Site-Smoke main entry point
//!
//! This is the command-line interface for the Site-Smoke health crawler.

use anyhow::Context;
use clap::Parser;
use site_smoke::config::{load_config_with_hash, Config};
use site_smoke::crawler::crawl;
use site_smoke::output::{
    print_statistics, write_markdown_report, LogObserver, ObserverSet, ReportObserver,
    UuidPrefixStats,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Site-Smoke: a single-site health crawler
///
/// Site-Smoke walks one web site breadth-first from a seed path, following
/// every internal link, and reports the pages that look broken: non-200
/// responses, login redirects, stack traces, or inline error messages.
#[derive(Parser, Debug)]
#[command(name = "site-smoke")]
#[command(version)]
#[command(about = "A single-site smoke-test crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Start from this path or URL instead of the configured seed
    #[arg(long, value_name = "PATH")]
    seed: Option<String>,

    /// Override the configured depth limit (-1 for unbounded)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_depth: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_smoke=info,warn"),
            1 => EnvFilter::new("site_smoke=debug,info"),
            2 => EnvFilter::new("site_smoke=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(seed) = &cli.seed {
        anyhow::ensure!(!seed.trim().is_empty(), "--seed cannot be empty");
        config.site.seed = seed.clone();
    }

    if let Some(depth) = cli.max_depth {
        anyhow::ensure!(depth >= -1, "--max-depth must be -1 or >= 0, got {}", depth);
        config.crawler.max_depth = depth;
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Smoke Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Seed: {}", config.site.seed);
    println!(
        "  Basic auth: {}",
        config.site.user.as_deref().unwrap_or("(none)")
    );

    println!("\nCrawler Configuration:");
    println!(
        "  Max parallel requests: {}",
        config.crawler.max_parallel_requests
    );
    println!(
        "  Max depth: {}",
        config
            .crawler
            .depth_limit()
            .map_or_else(|| "unbounded".to_string(), |d| d.to_string())
    );
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nScope:");
    println!("  Blocked paths: {:?}", config.scope.blocked_paths);
    println!("  Blocked markers: {:?}", config.scope.blocked_markers);

    println!("\nClassifier:");
    println!("  Login form id: {}", config.classifier.login_form_id);
    println!("  Stack trace id: {}", config.classifier.stack_trace_id);
    println!("  Error class: {}", config.classifier.error_class);
    println!(
        "  Message error class: {}",
        config.classifier.message_error_class
    );

    println!("\nOutput:");
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("(none)")
    );
    println!("  Stats prefix length: {}", config.output.stats_prefix_len);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    let started = Instant::now();

    let stats = Arc::new(UuidPrefixStats::new(config.output.stats_prefix_len));
    let report = Arc::new(ReportObserver::new(config.site.base_url.clone()));
    let observers = ObserverSet::new()
        .with(Arc::new(LogObserver::new()))
        .with(stats.clone())
        .with(report.clone());

    let visited = crawl(&config, Arc::new(observers))
        .await
        .context("Crawl failed")?;

    tracing::info!(
        "Crawl completed: {} pages visited in {:?}",
        visited,
        started.elapsed()
    );

    let prefix_stats = stats.snapshot();
    print_statistics(&prefix_stats);

    let summary = report.finish(visited, prefix_stats, Some(config_hash));
    let error_pages = summary.pages_with_errors().count();
    if error_pages > 0 {
        tracing::warn!("{} of {} pages reported errors", error_pages, summary.pages.len());
    }

    if let Some(path) = &config.output.summary_path {
        write_markdown_report(&summary, Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        tracing::info!("Summary written to: {}", path);
    }

    Ok(())
}
