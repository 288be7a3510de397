//! Run statistics collected from seed crawls
//!
//! This module provides the per-seed outcome records a batch run produces
//! and the summary printed once the run ends.

use crate::crawler::{CrawlCounters, CrawlResult};
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one seed
#[derive(Debug, Clone, Default)]
pub struct SeedOutcome {
    /// The seed as given
    pub seed: String,

    /// Origin the crawl was confined to (empty if the task never ran)
    pub origin: String,

    /// Number of URLs in the result
    pub urls: usize,

    /// Number of those URLs that are documents
    pub documents: usize,

    pub counters: CrawlCounters,

    /// File the result was written to
    pub output: Option<PathBuf>,

    /// Why the seed produced no artifact (write failure or task panic)
    pub error: Option<String>,
}

impl SeedOutcome {
    /// Outcome of a crawl that ran, with the write result
    pub fn from_result(result: &CrawlResult, written: Result<PathBuf, String>) -> Self {
        let (output, error) = match written {
            Ok(path) => (Some(path), None),
            Err(e) => (None, Some(e)),
        };

        Self {
            seed: result.seed.clone(),
            origin: result.origin.clone(),
            urls: result.len(),
            documents: result.documents().count(),
            counters: result.counters,
            output,
            error,
        }
    }

    /// Outcome of a task that died before producing a result
    pub fn aborted(seed: &str, error: impl Into<String>) -> Self {
        Self {
            seed: seed.to_string(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Returns true if the seed's artifact was written
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole batch run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One outcome per distinct seed, in seed order
    pub outcomes: Vec<SeedOutcome>,

    /// Seeds dropped because they normalized to an earlier seed
    pub duplicate_seeds: usize,

    /// Number of batch groups run
    pub groups: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Returns true if no seed was crawled
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of seeds whose artifact was written
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Outcomes of seeds that produced no artifact
    pub fn failures(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Total URLs written across all seeds
    pub fn total_urls(&self) -> usize {
        self.outcomes.iter().map(|o| o.urls).sum()
    }

    /// Counters summed across all seeds
    pub fn totals(&self) -> CrawlCounters {
        self.outcomes
            .iter()
            .fold(CrawlCounters::default(), |mut acc, o| {
                acc.fetched += o.counters.fetched;
                acc.failed += o.counters.failed;
                acc.not_found += o.counters.not_found;
                acc.documents += o.counters.documents;
                acc.rejected_links += o.counters.rejected_links;
                acc.duplicate_links += o.counters.duplicate_links;
                acc
            })
    }
}

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_run_report(report: &RunReport) {
    println!("=== Sweep Summary ===\n");

    if report.is_empty() {
        println!("No seeds to crawl.");
        return;
    }

    let totals = report.totals();

    println!("Overview:");
    println!(
        "  Seeds crawled: {} ({} duplicates skipped)",
        report.outcomes.len(),
        report.duplicate_seeds
    );
    println!("  Batch groups: {}", report.groups);
    println!("  URLs collected: {}", report.total_urls());
    println!("  Documents: {}", totals.documents);
    println!("  Duration: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    println!("Fetches:");
    println!("  Succeeded: {}", totals.fetched);
    println!("  Failed: {}", totals.failed);
    println!("  Not-found pages: {}", totals.not_found);
    println!("  Links rejected: {}", totals.rejected_links);
    println!();

    println!("Seeds:");
    let mut outcomes: Vec<_> = report.outcomes.iter().collect();
    outcomes.sort_by(|a, b| b.urls.cmp(&a.urls));
    for outcome in outcomes {
        match &outcome.output {
            Some(path) => println!(
                "  {}: {} urls -> {}",
                outcome.seed,
                outcome.urls,
                path.display()
            ),
            None => println!("  {}: no output", outcome.seed),
        }
    }
    println!();

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("Errors ({}):", failures.len());
        for outcome in failures {
            println!(
                "  - {}: {}",
                outcome.seed,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} seeds written)",
        (report.succeeded() as f64 / report.outcomes.len() as f64) * 100.0,
        report.succeeded(),
        report.outcomes.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(seed: &str, urls: usize, fetched: u64) -> SeedOutcome {
        SeedOutcome {
            seed: seed.to_string(),
            origin: "example.edu".to_string(),
            urls,
            counters: CrawlCounters {
                fetched,
                ..CrawlCounters::default()
            },
            output: Some(PathBuf::from("out.json")),
            ..SeedOutcome::default()
        }
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::default();
        assert!(report.is_empty());
        assert_eq!(report.total_urls(), 0);
        assert_eq!(report.succeeded(), 0);
    }

    #[test]
    fn test_totals() {
        let report = RunReport {
            outcomes: vec![
                outcome("https://a.edu/", 10, 8),
                outcome("https://b.edu/", 5, 4),
                SeedOutcome::aborted("https://c.edu/", "task panicked"),
            ],
            ..RunReport::default()
        };

        assert_eq!(report.total_urls(), 15);
        assert_eq!(report.totals().fetched, 12);
        assert_eq!(report.succeeded(), 2);

        let failed: Vec<_> = report.failures().map(|o| o.seed.as_str()).collect();
        assert_eq!(failed, vec!["https://c.edu/"]);
    }
}
