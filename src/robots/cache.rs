//! Per-origin robots.txt cache shared by concurrent seed crawls

use crate::robots::RobotsRules;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Robots rules keyed by `scheme://authority`
///
/// Entries live for the whole run; a robots.txt file is fetched at most once
/// per origin unless two crawls race on the first lookup.
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, Arc<RobotsRules>>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rules for an origin key, if any
    pub async fn get(&self, key: &str) -> Option<Arc<RobotsRules>> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores rules for an origin key
    ///
    /// When another task stored rules first, those are kept and returned.
    pub async fn insert(&self, key: String, rules: RobotsRules) -> Arc<RobotsRules> {
        self.entries
            .lock()
            .await
            .entry(key)
            .or_insert_with(|| Arc::new(rules))
            .clone()
    }

    /// Number of cached origins
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
