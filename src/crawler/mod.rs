//! Crawler module for same-origin link harvesting
//!
//! This module contains the core crawling logic, including:
//! - The per-seed frontier and crawl driver
//! - Batched, paced execution of many seeds
//! - The fetch collaborator trait and its HTTP implementation
//! - HTML parsing and link extraction

mod batch;
mod driver;
mod fetcher;
mod frontier;
mod parser;
mod settings;

pub use batch::BatchOrchestrator;
pub use driver::{CrawlCounters, CrawlResult, SeedCrawl};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpFetcher, Link};
pub use frontier::{Admission, Frontier, FrontierEntry};
pub use parser::{internal_links, parse_html, ParsedPage};
pub use settings::CrawlSettings;

use crate::config::Config;
use crate::output::{OutputError, RunReport};
use std::sync::Arc;

/// Runs a complete sweep over a seed list
///
/// This is the main entry point for a run. It will:
/// 1. Build the crawl settings from the configuration
/// 2. Build the HTTP fetcher
/// 3. Make sure the output directory exists
/// 4. Crawl the seeds in paced groups, writing one artifact per seed
///
/// # Arguments
///
/// * `config` - The loaded configuration
/// * `seeds` - Seed URLs, already collected
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished; per-seed failures are in the report
/// * `Err(SweepError)` - Settings, the HTTP client or the output directory
///   could not be set up
pub async fn sweep(config: &Config, seeds: Vec<String>) -> crate::Result<RunReport> {
    let settings = Arc::new(CrawlSettings::from_config(config)?);
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.fetch)?);

    let directory = &config.output.directory;
    std::fs::create_dir_all(directory).map_err(|source| OutputError::CreateDir {
        path: directory.clone(),
        source,
    })?;

    let orchestrator = BatchOrchestrator::from_config(config, settings, fetcher);
    Ok(orchestrator.run(seeds).await)
}
