//! Job-Harvest main entry point
//!
//! This is the command-line interface for the Job-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use job_harvest::config::{load_config_with_hash, Config};
use job_harvest::crawler::{plan, Coordinator};
use job_harvest::output::{print_summary, CrawlSummary};
use job_harvest::state::{CrawlState, Partition};
use job_harvest::storage::{open_store, RecordStore};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Job-Harvest: an incremental, polite job-listing crawler
///
/// Collects a bounded number of job postings spread across region and
/// category partitions, resuming from the previous dataset on every run.
#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(version)]
#[command(about = "An incremental, polite job-listing crawler", long_about = None)]
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

    /// Ignore the existing dataset instead of resuming from it
    #[arg(long)]
    fresh: bool,

    /// Validate config and show the crawl plan without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show counts from the existing dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.fresh)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_harvest=info,warn"),
            1 => EnvFilter::new("job_harvest=debug,info"),
            2 => EnvFilter::new("job_harvest=trace,debug"),
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

/// Handles --dry-run: shows partitions and the quota a real run would use
fn handle_dry_run(config: &Config, fresh: bool) -> anyhow::Result<()> {
    println!("=== Job-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Target records: {}", config.crawler.target_count);
    println!("  Checkpoint interval: {}", config.crawler.checkpoint_interval);
    println!(
        "  Delay: {}-{}ms ({:?})",
        config.crawler.min_delay_ms, config.crawler.max_delay_ms, config.crawler.pacing
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  Progress: {}", config.output.progress_path);

    let partitions = Partition::enumerate(config)?;
    println!("\nPartitions ({}):", partitions.len());
    for partition in &partitions {
        println!("  - {} -> {}", partition, partition.listing_url());
    }

    let prior = if fresh {
        Vec::new()
    } else {
        open_store(&config.output.records_path).load()?
    };
    let state = CrawlState::seeded(config.crawler.target_count, prior);

    println!("\n✓ Configuration is valid");
    println!("✓ {} existing records", state.len());
    if state.remaining() == 0 {
        println!("✓ Target already met, a run would only rewrite the dataset");
    } else {
        let quota_plan = plan(state.remaining(), &partitions, &mut rand::rng());
        println!(
            "✓ Would collect {} more records, at most {} per partition",
            quota_plan.remaining, quota_plan.quota
        );
    }

    Ok(())
}

/// Handles --stats: summarizes the canonical dataset on disk
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Dataset: {}\n", config.output.records_path);

    let records = open_store(&config.output.records_path).load()?;
    let summary = CrawlSummary::from_records(
        &records,
        records.len(),
        config.crawler.target_count,
        chrono::Utc::now(),
    );
    print_summary(&summary);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring existing dataset)");
    } else {
        tracing::info!("Starting crawl (will resume from existing dataset)");
    }

    tracing::info!(
        "Regions: {}, Categories: {}, Target: {}",
        config.regions.len(),
        config.categories.len(),
        config.crawler.target_count
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current posting");
            on_interrupt.cancel();
        }
    });

    let mut coordinator = Coordinator::new(config, fresh)
        .context("crawler could not start")?
        .with_cancellation(cancel);

    match coordinator.run().await {
        Ok(summary) => {
            tracing::info!("Crawl completed with {} records", summary.total_records);
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
