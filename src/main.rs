//! Origin-Sweep main entry point
//!
//! This is the command-line interface for the Origin-Sweep link harvester.

use anyhow::Context;
use clap::Parser;
use origin_sweep::config::{collect_seeds, load_config_with_hash, Config};
use origin_sweep::crawler::sweep;
use origin_sweep::output::print_run_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Origin-Sweep: a same-origin link harvester
///
/// Origin-Sweep walks every page reachable from each seed URL without leaving
/// the seed's origin, and writes one deduplicated list of page and document
/// URLs per seed for later content extraction.
#[derive(Parser, Debug)]
#[command(name = "origin-sweep")]
#[command(version)]
#[command(about = "A same-origin link harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Extra seed URL, added after the configured seeds (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // The seed list is read exactly once, before any crawl starts; a dry run
    // leaves the seed file untouched
    let seeds = collect_seeds(&config.seeds, &cli.seeds, !cli.dry_run);

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    handle_sweep(&config, seeds, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("origin_sweep=info,warn"),
            1 => EnvFilter::new("origin_sweep=debug,info"),
            2 => EnvFilter::new("origin_sweep=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration and seed list
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Origin-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seeds per group: {}", config.crawler.concurrency);
    match config.crawler.depth_cap() {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Pause between groups: {}ms", config.crawler.batch_pause_ms);

    println!("\nNormalization:");
    println!("  Stripped host prefix: {:?}", config.normalize.strip_prefix);
    println!("  Exempt hosts: {:?}", config.normalize.exempt_hosts);

    println!("\nClassification:");
    println!("  Documents: {:?}", config.classify.document_extensions);
    println!("  Pages: {:?}", config.classify.page_extensions);
    println!("  Exclusions: {}", config.classify.exclude_patterns.len());
    println!("  Split documents: {}", config.classify.split_documents);
    println!(
        "  Sentinel fragment: {:?} ({:?})",
        config.classify.sentinel_fragment, config.classify.sentinel_match
    );

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent());
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Respect robots.txt: {}", config.fetch.respect_robots);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Mode: {:?}", config.output.mode);

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());
}

/// Handles the main sweep operation
async fn handle_sweep(config: &Config, seeds: Vec<String>, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Sweeping {} seeds, {} at a time",
        seeds.len(),
        config.crawler.concurrency
    );

    let report = sweep(config, seeds).await.context("Sweep failed")?;

    if !quiet {
        print_run_report(&report);
    }

    let failures = report.failures().count();
    if failures > 0 {
        tracing::warn!("{} seeds produced no output", failures);
    }

    Ok(())
}
