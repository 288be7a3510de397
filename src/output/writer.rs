//! Per-seed JSON result writer

use crate::config::{OutputConfig, OutputMode};
use crate::crawler::CrawlResult;
use crate::output::{OutputError, OutputResult};
use crate::url::NormalizedUrl;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const FILE_SUFFIX: &str = "_crawled_links.json";

/// Longest path slug kept in a disambiguated file name
const MAX_SLUG_LEN: usize = 60;

/// Split-mode artifact, keyed the way the downstream scraper reads it
#[derive(Serialize)]
struct SplitArtifact<'a> {
    html: Vec<&'a str>,
    document: Vec<&'a str>,
}

/// Writes one JSON file per seed into an output directory
///
/// # File Names
///
/// | Situation | Name |
/// |-----------|------|
/// | host used by one seed | `<host>_crawled_links.json` |
/// | host shared by several seeds | `<host>_<path-slug>_<hash8>_crawled_links.json` |
///
/// `hash8` is the first 8 hex digits of the SHA-256 of the normalized seed,
/// so re-running the same seed list overwrites the same files.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    directory: PathBuf,
    mode: OutputMode,
    shared_hosts: HashSet<String>,
}

impl ResultWriter {
    pub fn new(directory: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            directory: directory.into(),
            mode,
            shared_hosts: HashSet::new(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.directory.clone(), config.mode)
    }

    /// Marks hosts that more than one of the run's seeds share
    pub fn for_seeds<'a, I>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedUrl>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for seed in seeds {
            *counts.entry(seed.host()).or_default() += 1;
        }

        self.shared_hosts = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(host, _)| host.to_string())
            .collect();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name for a seed's artifact
    pub fn file_name(&self, seed: &NormalizedUrl) -> String {
        let host = sanitize_host(seed.host());

        if self.shared_hosts.contains(seed.host()) {
            format!(
                "{}_{}_{}{}",
                host,
                path_slug(seed.path()),
                hash8(seed),
                FILE_SUFFIX
            )
        } else {
            format!("{}{}", host, FILE_SUFFIX)
        }
    }

    /// Serializes a result in the configured mode
    pub fn render(&self, result: &CrawlResult) -> OutputResult<String> {
        let json = match self.mode {
            OutputMode::Flat => {
                let urls: Vec<&str> = result.urls().map(|u| u.as_str()).collect();
                serde_json::to_string_pretty(&urls)?
            }
            OutputMode::Split => serde_json::to_string_pretty(&SplitArtifact {
                html: result.pages().map(|u| u.as_str()).collect(),
                document: result.documents().map(|u| u.as_str()).collect(),
            })?,
        };
        Ok(json)
    }

    /// Writes a seed's result, creating the directory if needed
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(OutputError)` - The directory or file could not be written
    pub fn write(&self, result: &CrawlResult) -> OutputResult<PathBuf> {
        std::fs::create_dir_all(&self.directory).map_err(|source| OutputError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.directory.join(self.file_name(&result.normalized_seed));
        let json = self.render(result)?;

        std::fs::write(&path, json).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Wrote {} urls to {}", result.len(), path.display());
        Ok(path)
    }
}

fn sanitize_host(host: &str) -> String {
    if host.is_empty() {
        return "unknown-host".to_string();
    }
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn path_slug(path: &str) -> String {
    let mut slug = String::new();
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "root".to_string()
    } else {
        slug.to_string()
    }
}

fn hash8(seed: &NormalizedUrl) -> String {
    let digest = Sha256::digest(seed.as_str().as_bytes());
    hex::encode(digest)[..8].to_string()
}
