use crate::config::types::{ClassifyConfig, Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Upper bound on seed crawls per batch group
const MAX_CONCURRENCY: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_classify_config(&config.classify)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_hosts(&config.normalize.exempt_hosts)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth of 0 means unlimited, every u32 is legal

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    Ok(())
}

/// Validates classification settings, compiling every exclusion pattern once
fn validate_classify_config(config: &ClassifyConfig) -> Result<(), ConfigError> {
    for pattern in &config.exclude_patterns {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    if config.sentinel_fragment.trim_start_matches('#').is_empty() {
        return Err(ConfigError::Validation(
            "sentinel-fragment cannot be empty".to_string(),
        ));
    }

    for ext in config
        .document_extensions
        .iter()
        .chain(config.page_extensions.iter())
    {
        if ext.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "extension entries cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fetcher identity
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates prefix-exempt host names
fn validate_hosts(hosts: &[String]) -> Result<(), ConfigError> {
    for host in hosts {
        validate_host_string(host)?;
    }
    Ok(())
}

/// Validates a bare host name
fn validate_host_string(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::Validation("Host cannot be empty".to_string()));
    }

    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Host '{}' has a misplaced dot",
            host
        )));
    }

    Ok(())
}
