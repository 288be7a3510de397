//! Configuration module for Origin-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and reading the seed list once before any crawl begins.
//!
//! # Example
//!
//! ```no_run
//! use origin_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Seeds per batch group: {}", config.crawler.concurrency);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifyConfig, Config, CrawlerConfig, FetchConfig, NormalizeConfig, OutputConfig,
    OutputMode, SeedsConfig, SentinelMatch,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use seeds::{collect_seeds, load_seed_list};
