//! Seed crawl driver - runs one seed to completion
//!
//! This module contains the per-seed crawl loop:
//! - Seeding the frontier and deriving the origin
//! - Popping URLs and dispatching them to the fetch collaborator
//! - Filtering soft "not found" pages
//! - Feeding internal links back into the frontier
//! - Collecting the ordered result for the writer

use crate::crawler::frontier::{Admission, Frontier};
use crate::crawler::{CrawlSettings, Fetcher};
use crate::url::{NormalizedUrl, UrlClass};
use std::sync::Arc;

/// Counters collected while crawling one seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Fetches that succeeded
    pub fetched: u64,
    /// Fetches that failed
    pub failed: u64,
    /// Successful fetches that turned out to be soft "not found" pages
    pub not_found: u64,
    /// Documents recorded without fetching
    pub documents: u64,
    /// Discovered links refused by scope, sentinel, depth or classification
    pub rejected_links: u64,
    /// Discovered links already visited or queued
    pub duplicate_links: u64,
}

/// Ordered outcome of one seed crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The seed as given
    pub seed: String,
    /// The seed after normalization
    pub normalized_seed: NormalizedUrl,
    /// Host every result URL belongs to
    pub origin: String,
    /// Result URLs in discovery order, seed first
    pub entries: Vec<(NormalizedUrl, UrlClass)>,
    pub counters: CrawlCounters,
}

impl CrawlResult {
    /// All result URLs in order
    pub fn urls(&self) -> impl Iterator<Item = &NormalizedUrl> {
        self.entries.iter().map(|(url, _)| url)
    }

    /// Result URLs that are pages
    pub fn pages(&self) -> impl Iterator<Item = &NormalizedUrl> {
        self.of_class(UrlClass::Page)
    }

    /// Result URLs that are documents
    pub fn documents(&self) -> impl Iterator<Item = &NormalizedUrl> {
        self.of_class(UrlClass::Document)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn of_class(&self, class: UrlClass) -> impl Iterator<Item = &NormalizedUrl> {
        self.entries
            .iter()
            .filter(move |(_, c)| *c == class)
            .map(|(url, _)| url)
    }
}

/// Crawl of a single seed
///
/// Owns its frontier outright; nothing mutable is shared with other seeds.
pub struct SeedCrawl {
    seed: String,
    normalized_seed: NormalizedUrl,
    frontier: Frontier,
    settings: Arc<CrawlSettings>,
    entries: Vec<(NormalizedUrl, UrlClass)>,
    counters: CrawlCounters,
}

impl SeedCrawl {
    /// Prepares a crawl: normalizes the seed, derives the origin and seeds
    /// the frontier at depth 0
    ///
    /// The seed heads the result whatever happens to it later.
    pub fn new(seed: &str, settings: Arc<CrawlSettings>) -> Self {
        let normalized_seed = settings.normalizer.normalize(seed);
        let origin = normalized_seed.host().to_string();
        let mut frontier = Frontier::new(origin, Arc::clone(&settings));

        let admission = frontier.seed(normalized_seed.clone());
        let seed_class = match admission {
            Admission::Document => UrlClass::Document,
            _ => UrlClass::Page,
        };

        match admission {
            Admission::Queued | Admission::Document => {
                tracing::debug!("Seed {} admitted as {}", normalized_seed, admission)
            }
            _ => tracing::warn!(
                "Seed {} not crawlable ({}), recording it alone",
                normalized_seed,
                admission
            ),
        }

        let mut counters = CrawlCounters::default();
        if admission == Admission::Document {
            counters.documents += 1;
        }

        Self {
            seed: seed.to_string(),
            entries: vec![(normalized_seed.clone(), seed_class)],
            normalized_seed,
            frontier,
            settings,
            counters,
        }
    }

    /// Host every result URL belongs to
    pub fn origin(&self) -> &str {
        self.frontier.origin()
    }

    /// The frontier, for inspection
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Mutable frontier access, for preloading entries
    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    /// Result entries collected so far
    pub fn entries(&self) -> &[(NormalizedUrl, UrlClass)] {
        &self.entries
    }

    /// Runs the crawl until the frontier is empty
    pub async fn run(mut self, fetcher: &dyn Fetcher) -> CrawlResult {
        tracing::info!("Crawling {} (origin {})", self.normalized_seed, self.origin());

        while self.step(fetcher).await {}

        let result = self.into_result();
        tracing::info!(
            "Finished {}: {} urls, {} fetched, {} failed, {} not found",
            result.normalized_seed,
            result.entries.len(),
            result.counters.fetched,
            result.counters.failed,
            result.counters.not_found
        );
        result
    }

    /// Processes the next frontier entry
    ///
    /// Returns false once the frontier is empty and nothing was done.
    pub async fn step(&mut self, fetcher: &dyn Fetcher) -> bool {
        let Some(entry) = self.frontier.pop_next() else {
            return false;
        };
        let url = entry.url;

        if self.settings.sentinel.matches(&url) {
            tracing::debug!("Skipping sentinel URL {}", url);
            self.frontier.mark_visited(&url);
            return true;
        }

        let result = fetcher.fetch(url.as_str()).await;

        if !result.success {
            tracing::warn!("Failed to fetch {}: {}", url, result.error_message);
            self.counters.failed += 1;
            self.frontier.mark_visited(&url);
            return true;
        }

        self.counters.fetched += 1;

        if self.settings.is_not_found_page(&result.content) {
            tracing::info!("Not-found page at {}, dropping it", url);
            self.counters.not_found += 1;
            self.frontier.mark_visited(&url);
            return true;
        }

        if url != self.normalized_seed {
            self.entries.push((url.clone(), UrlClass::Page));
        }
        self.frontier.mark_visited(&url);

        let next_depth = entry.depth.saturating_add(1);
        for link in &result.internal_links {
            let href = link.href.trim();
            if href.is_empty() {
                continue;
            }

            let candidate = self.settings.normalizer.normalize(href);
            let admission = self.frontier.enqueue(candidate.clone(), next_depth);
            tracing::trace!("{} -> {}", candidate, admission);

            match admission {
                Admission::Queued => {}
                Admission::Document => {
                    self.counters.documents += 1;
                    self.entries.push((candidate, UrlClass::Document));
                }
                Admission::Duplicate => self.counters.duplicate_links += 1,
                Admission::TooDeep
                | Admission::Sentinel
                | Admission::OutOfScope
                | Admission::Rejected => self.counters.rejected_links += 1,
            }
        }

        true
    }

    /// Finishes the crawl and hands back its result
    pub fn into_result(self) -> CrawlResult {
        if self.counters.failed > 0 {
            tracing::info!(
                "{} fetches failed while crawling {}",
                self.counters.failed,
                self.normalized_seed
            );
        }

        CrawlResult {
            seed: self.seed,
            origin: self.frontier.origin().to_string(),
            normalized_seed: self.normalized_seed,
            entries: self.entries,
            counters: self.counters,
        }
    }
}
