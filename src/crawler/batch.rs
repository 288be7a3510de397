//! Batch orchestrator - runs many seeds in bounded, paced groups
//!
//! Seeds are crawled in consecutive groups of at most `concurrency`. Every
//! seed in a group is its own tokio task with its own `SeedCrawl`; the group
//! is joined before the next one starts, with a fixed pause in between.

use crate::config::Config;
use crate::crawler::{CrawlSettings, Fetcher, SeedCrawl};
use crate::output::{ResultWriter, RunReport, SeedOutcome};
use crate::url::NormalizedUrl;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs seed crawls in groups and writes their results
pub struct BatchOrchestrator {
    settings: Arc<CrawlSettings>,
    fetcher: Arc<dyn Fetcher>,
    writer: ResultWriter,
    concurrency: usize,
    pause: Duration,
}

impl BatchOrchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `settings` - Shared crawl settings
    /// * `fetcher` - Fetch collaborator shared by every seed
    /// * `writer` - Destination for each seed's result
    /// * `concurrency` - Maximum seeds per group (at least 1)
    /// * `pause` - Delay between consecutive groups
    pub fn new(
        settings: Arc<CrawlSettings>,
        fetcher: Arc<dyn Fetcher>,
        writer: ResultWriter,
        concurrency: usize,
        pause: Duration,
    ) -> Self {
        Self {
            settings,
            fetcher,
            writer,
            concurrency: concurrency.max(1),
            pause,
        }
    }

    /// Creates an orchestrator from a validated configuration
    pub fn from_config(
        config: &Config,
        settings: Arc<CrawlSettings>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self::new(
            settings,
            fetcher,
            ResultWriter::from_config(&config.output),
            config.crawler.concurrency as usize,
            Duration::from_millis(config.crawler.batch_pause_ms),
        )
    }

    /// Crawls every seed and writes one artifact per distinct seed
    ///
    /// A seed whose task panics or whose result cannot be written is
    /// recorded in the report; its siblings and later groups still run.
    pub async fn run(&self, seeds: Vec<String>) -> RunReport {
        let start = Instant::now();
        let (seeds, duplicate_seeds) = self.dedup_seeds(seeds);

        let mut report = RunReport {
            duplicate_seeds,
            ..RunReport::default()
        };

        if seeds.is_empty() {
            tracing::info!("No seeds to crawl");
            return report;
        }

        let writer = Arc::new(
            self.writer
                .clone()
                .for_seeds(seeds.iter().map(|(_, normalized)| normalized)),
        );

        let groups: Vec<_> = seeds.chunks(self.concurrency).collect();
        let group_count = groups.len();

        for (index, group) in groups.into_iter().enumerate() {
            tracing::info!(
                "Starting group {}/{} ({} seeds)",
                index + 1,
                group_count,
                group.len()
            );

            let handles = group.iter().map(|(seed, _)| {
                let seed = seed.clone();
                let settings = Arc::clone(&self.settings);
                let fetcher = Arc::clone(&self.fetcher);
                let writer = Arc::clone(&writer);

                tokio::spawn(async move {
                    let result = SeedCrawl::new(&seed, settings).run(&*fetcher).await;
                    let written = writer.write(&result).map_err(|e| {
                        tracing::error!("Failed to write result for {}: {}", seed, e);
                        e.to_string()
                    });
                    SeedOutcome::from_result(&result, written)
                })
            });

            for ((seed, _), joined) in group.iter().zip(join_all(handles).await) {
                match joined {
                    Ok(outcome) => report.outcomes.push(outcome),
                    Err(e) => {
                        tracing::error!("Crawl task for {} failed: {}", seed, e);
                        report.outcomes.push(SeedOutcome::aborted(seed, e.to_string()));
                    }
                }
            }

            report.groups += 1;

            if index + 1 < group_count && !self.pause.is_zero() {
                tracing::debug!("Pausing {:?} before the next group", self.pause);
                tokio::time::sleep(self.pause).await;
            }
        }

        report.elapsed = start.elapsed();
        tracing::info!(
            "Run complete: {} seeds, {} urls in {:?}",
            report.outcomes.len(),
            report.total_urls(),
            report.elapsed
        );
        report
    }

    /// Drops seeds that normalize to an earlier seed, keeping order
    fn dedup_seeds(&self, seeds: Vec<String>) -> (Vec<(String, NormalizedUrl)>, usize) {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(seeds.len());
        let mut duplicates = 0;

        for seed in seeds {
            let normalized = self.settings.normalizer.normalize(&seed);
            if seen.insert(normalized.clone()) {
                unique.push((seed, normalized));
            } else {
                tracing::debug!("Skipping duplicate seed {}", seed);
                duplicates += 1;
            }
        }

        (unique, duplicates)
    }
}
