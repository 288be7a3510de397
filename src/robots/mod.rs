//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! It respects robots.txt directives when fetching pages.

mod cache;
mod rules;

pub use cache::RobotsCache;
pub use rules::{product_token, RobotsRules};

use reqwest::Client;
use url::Url;

/// Cache key for the robots.txt governing a URL: `scheme://authority`
///
/// Returns None for URLs without a host.
pub fn robots_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Fetches robots.txt for an origin key
///
/// Any failure (network error, 4xx, 5xx, unreadable body) yields permissive
/// rules.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `key` - Origin key as returned by `robots_key`
pub async fn fetch_robots(client: &Client, key: &str) -> RobotsRules {
    let robots_url = format!("{}/robots.txt", key);
    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt unavailable at {}: {}", robots_url, e);
            return RobotsRules::permissive();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned HTTP {}, allowing all",
            robots_url,
            response.status().as_u16()
        );
        return RobotsRules::permissive();
    }

    match response.text().await {
        Ok(body) => RobotsRules::from_body(&body),
        Err(e) => {
            tracing::debug!("Failed to read robots.txt at {}: {}", robots_url, e);
            RobotsRules::permissive()
        }
    }
}
