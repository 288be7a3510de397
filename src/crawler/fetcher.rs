//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `Fetcher` collaborator trait the crawl driver talks to
//! - Building HTTP clients with proper user agent strings
//! - robots.txt checks, cached per origin
//! - GET requests and error classification
//! - Extracting internal links from HTML responses

use crate::config::FetchConfig;
use crate::crawler::parser::{internal_links, parse_html};
use crate::robots::{fetch_robots, robots_key, RobotsCache};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A link reported by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute target URL
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Result of a fetch operation
///
/// Failures are values, not errors: the crawl logs them and moves on.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    /// Whether the page was retrieved
    pub success: bool,

    /// Response body (empty on failure)
    pub content: String,

    /// Links on the page that point at the page's own site
    pub internal_links: Vec<Link>,

    /// Failure description (empty on success)
    pub error_message: String,
}

impl FetchResult {
    /// A successful fetch
    pub fn success(content: impl Into<String>, internal_links: Vec<Link>) -> Self {
        Self {
            success: true,
            content: content.into(),
            internal_links,
            error_message: String::new(),
        }
    }

    /// A failed fetch
    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            internal_links: Vec::new(),
            error_message: error_message.into(),
        }
    }
}

/// Fetch collaborator used by the crawl driver
///
/// Implementations are shared across concurrent seed crawls.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves a URL and reports its internal links
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use origin_sweep::config::FetchConfig;
/// use origin_sweep::crawler::build_http_client;
///
/// let config = FetchConfig {
///     crawler_name: "OriginSweep".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
///     contact_email: "bot@example.com".to_string(),
///     timeout_secs: 30,
///     respect_robots: true,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by reqwest
///
/// # Request Flow
///
/// 1. Parse the URL; an unparsable URL is a failure
/// 2. If robots checks are on, consult (or fetch once) the origin's robots.txt
/// 3. GET, following up to 10 redirects
/// 4. Map the response:
///
/// | Condition | Result |
/// |-----------|--------|
/// | Disallowed by robots.txt | failure |
/// | Non-2xx status | failure `HTTP <code>` |
/// | Timeout / connection error | failure |
/// | 2xx, HTML | success with internal links |
/// | 2xx, other content type | success, no links |
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    respect_robots: bool,
    robots: RobotsCache,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent(),
            respect_robots: config.respect_robots,
            robots: RobotsCache::new(),
        }
    }

    /// Checks a URL against its origin's robots.txt
    async fn robots_allow(&self, url: &Url) -> bool {
        let Some(key) = robots_key(url) else {
            return true;
        };

        let rules = match self.robots.get(&key).await {
            Some(rules) => rules,
            None => {
                let fetched = fetch_robots(&self.client, &key).await;
                self.robots.insert(key, fetched).await
            }
        };

        rules.allows(url.as_str(), &self.user_agent)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let target = match Url::parse(url) {
            Ok(target) => target,
            Err(e) => return FetchResult::failure(format!("Invalid URL: {}", e)),
        };

        if self.respect_robots && !self.robots_allow(&target).await {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return FetchResult::failure("Disallowed by robots.txt");
        }

        let response = match self.client.get(target).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                return FetchResult::failure(message);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failure(format!("HTTP {}", status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchResult::failure(format!("Failed to read body: {}", e)),
        };

        if !is_html(&content_type) {
            tracing::debug!("{} is {}, not following links", final_url, content_type);
            return FetchResult::success(body, Vec::new());
        }

        let parsed = parse_html(&body, &final_url);
        let page_host = final_url.host_str().unwrap_or("");
        let links = internal_links(&parsed.links, page_host)
            .into_iter()
            .map(Link::new)
            .collect::<Vec<_>>();

        tracing::debug!(
            "Fetched {} ({}): {} internal of {} links",
            final_url,
            parsed.title.as_deref().unwrap_or("untitled"),
            links.len(),
            parsed.links.len()
        );

        FetchResult::success(body, links)
    }
}

/// Returns true for HTML content types; a missing header counts as HTML
fn is_html(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml")
}
