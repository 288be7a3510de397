use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Origin-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub seeds: SeedsConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of seed crawls run side by side in one batch group
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Maximum hop count from the seed; 0 means unlimited
    #[serde(rename = "max-depth", default)]
    pub max_depth: u32,

    /// Pause between batch groups (milliseconds)
    #[serde(rename = "batch-pause-ms", default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
}

impl CrawlerConfig {
    /// Depth cap as an option, `None` meaning unlimited
    pub fn depth_cap(&self) -> Option<u32> {
        (self.max_depth > 0).then_some(self.max_depth)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_depth: 0,
            batch_pause_ms: default_batch_pause_ms(),
        }
    }
}

/// Where seed URLs come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedsConfig {
    /// JSON file holding an array of seed URLs
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Seeds listed inline in the config file
    #[serde(default)]
    pub urls: Vec<String>,

    /// Fallback seed used when no source yields a seed
    #[serde(default)]
    pub default: Option<String>,
}

/// Host canonicalization settings
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    /// Host label stripped during normalization; empty disables stripping
    #[serde(rename = "strip-prefix", default = "default_strip_prefix")]
    pub strip_prefix: String,

    /// Hosts (and their subdomains) that keep the prefix
    #[serde(rename = "exempt-hosts", default)]
    pub exempt_hosts: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            strip_prefix: default_strip_prefix(),
            exempt_hosts: Vec::new(),
        }
    }
}

/// How the sentinel marker is compared with a URL fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelMatch {
    /// Fragment equals the marker
    #[default]
    Exact,
    /// Fragment starts with the marker
    Prefix,
}

/// Link classification settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    #[serde(rename = "document-extensions", default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    #[serde(rename = "page-extensions", default = "default_page_extensions")]
    pub page_extensions: Vec<String>,

    /// Regular expressions matched against the normalized URL
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,

    /// Record documents without fetching them
    #[serde(rename = "split-documents", default)]
    pub split_documents: bool,

    #[serde(rename = "sentinel-fragment", default = "default_sentinel_fragment")]
    pub sentinel_fragment: String,

    #[serde(rename = "sentinel-match", default)]
    pub sentinel_match: SentinelMatch,

    /// Phrases that together mark a soft "not found" page
    #[serde(rename = "not-found-markers", default = "default_not_found_markers")]
    pub not_found_markers: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            document_extensions: default_document_extensions(),
            page_extensions: default_page_extensions(),
            exclude_patterns: Vec::new(),
            split_documents: false,
            sentinel_fragment: default_sentinel_fragment(),
            sentinel_match: SentinelMatch::default(),
            not_found_markers: default_not_found_markers(),
        }
    }
}

/// HTTP fetcher identification and behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Check robots.txt before every fetch
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,
}

impl FetchConfig {
    /// Formats the user agent: `Name/Version (+ContactURL; ContactEmail)`
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Shape of the per-seed result artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One JSON array of URLs
    #[default]
    Flat,
    /// `{"html": [...], "document": [...]}`
    Split,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one file per seed
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub mode: OutputMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            mode: OutputMode::default(),
        }
    }
}

fn default_concurrency() -> u32 {
    8
}

fn default_batch_pause_ms() -> u64 {
    2000
}

fn default_strip_prefix() -> String {
    "www.".to_string()
}

fn default_document_extensions() -> Vec<String> {
    ["pdf", "doc", "docx", "xls", "xlsx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_page_extensions() -> Vec<String> {
    ["html", "htm", "php"].iter().map(|s| s.to_string()).collect()
}

fn default_sentinel_fragment() -> String {
    "page".to_string()
}

fn default_not_found_markers() -> Vec<String> {
    vec![
        "the requested url".to_string(),
        "was not found on this server.".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("crawled_links")
}
