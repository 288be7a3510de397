//! Seed list loading
//!
//! The seed file is a JSON array of URL strings. It is read once before any
//! crawl starts; a missing or malformed file never aborts the run.

use crate::config::SeedsConfig;
use std::path::Path;

/// Loads the seed list from a JSON file, repairing it when needed
///
/// - A missing file is created holding `[]`.
/// - Malformed JSON is treated as an empty list.
/// - An empty list falls back to `default` (when given), which is written back.
///
/// Write failures are logged and otherwise ignored.
pub fn load_seed_list(path: &Path, default: Option<&str>) -> Vec<String> {
    let mut seeds = match read_seed_file(path) {
        Some(seeds) => seeds,
        None => {
            write_seed_file(path, &[]);
            tracing::info!("Created new seed file at {} with an empty list", path.display());
            Vec::new()
        }
    };

    seeds.retain(|s| !s.trim().is_empty());

    if seeds.is_empty() {
        if let Some(default) = default {
            seeds.push(default.to_string());
            write_seed_file(path, &seeds);
            tracing::info!("No seeds found, added default seed: {}", default);
        }
    }

    seeds
}

/// Gathers seeds from every configured source: file, inline `urls`, then `extra`
///
/// The default seed is only used when all sources together are empty. With
/// `persist` off (dry runs) the seed file is read but never created or
/// rewritten.
pub fn collect_seeds(config: &SeedsConfig, extra: &[String], persist: bool) -> Vec<String> {
    let mut seeds = match &config.file {
        Some(path) if persist => load_seed_list(path, None),
        Some(path) => read_seed_file(path).unwrap_or_default(),
        None => Vec::new(),
    };

    seeds.extend(config.urls.iter().cloned());
    seeds.extend(extra.iter().cloned());
    seeds.retain(|s| !s.trim().is_empty());

    if seeds.is_empty() {
        if let Some(default) = &config.default {
            seeds.push(default.clone());
            match &config.file {
                Some(path) if persist => {
                    write_seed_file(path, &seeds);
                    tracing::info!("No seeds found, added default seed: {}", default);
                }
                _ => tracing::info!("No seeds found, using default seed: {}", default),
            }
        }
    }

    seeds
}

/// Reads a seed file as-is; `None` if it does not exist
fn read_seed_file(path: &Path) -> Option<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
            Ok(seeds) => Some(seeds),
            Err(e) => {
                tracing::warn!(
                    "Seed file {} was empty or malformed ({}), starting from an empty list",
                    path.display(),
                    e
                );
                Some(Vec::new())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("Could not read seed file {}: {}", path.display(), e);
            Some(Vec::new())
        }
    }
}

fn write_seed_file(path: &Path, seeds: &[String]) {
    let body = match serde_json::to_string_pretty(seeds) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Could not serialize seed list: {}", e);
            return;
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Could not create {}: {}", parent.display(), e);
            return;
        }
    }

    if let Err(e) = std::fs::write(path, body) {
        tracing::warn!("Could not write seed file {}: {}", path.display(), e);
    }
}
