//! Immutable per-run crawl settings shared by every seed crawl

use crate::config::Config;
use crate::url::{Classifier, Normalizer, SentinelFilter};
use crate::ConfigError;

/// Everything a seed crawl needs to judge URLs
///
/// Built once from the configuration and shared read-only (behind an `Arc`)
/// by all seed crawls of a run.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub normalizer: Normalizer,
    pub classifier: Classifier,
    pub sentinel: SentinelFilter,
    /// Maximum hop count from the seed; `None` means unlimited
    pub depth_cap: Option<u32>,
    /// Lowercased phrases that together identify a soft "not found" page
    pub not_found_markers: Vec<String>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            classifier: Classifier::default(),
            sentinel: SentinelFilter::default(),
            depth_cap: None,
            not_found_markers: vec![
                "the requested url".to_string(),
                "was not found on this server.".to_string(),
            ],
        }
    }
}

impl CrawlSettings {
    /// Builds crawl settings from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSettings)` - Settings ready to share across seeds
    /// * `Err(ConfigError)` - An exclusion pattern failed to compile
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let classify = &config.classify;

        Ok(Self {
            normalizer: Normalizer::new(
                config.normalize.strip_prefix.clone(),
                config.normalize.exempt_hosts.clone(),
            ),
            classifier: Classifier::new(classify)?,
            sentinel: SentinelFilter::new(&classify.sentinel_fragment, classify.sentinel_match),
            depth_cap: config.crawler.depth_cap(),
            not_found_markers: classify
                .not_found_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        })
    }

    /// Returns true if the body is a soft "not found" page
    ///
    /// Every marker must appear, compared case-insensitively. With no markers
    /// configured nothing is treated as not found.
    pub fn is_not_found_page(&self, content: &str) -> bool {
        if self.not_found_markers.is_empty() {
            return false;
        }

        let lowered = content.to_lowercase();
        self.not_found_markers
            .iter()
            .all(|marker| lowered.contains(marker.as_str()))
    }
}
