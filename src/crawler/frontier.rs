//! Frontier for one seed crawl
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched
//! - Visited/Queued membership so every URL is dispatched at most once
//! - Admission checks (depth, sentinel fragment, origin scope, URL class)

use crate::crawler::CrawlSettings;
use crate::state::UrlState;
use crate::url::{in_scope, NormalizedUrl, UrlClass};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// A URL queued for fetching, with its hop count from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to fetch
    pub url: NormalizedUrl,

    /// Hop count from the seed (the seed is 0)
    pub depth: u32,
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Admission {
    /// Appended to the queue
    Queued,
    /// Recorded as a document without fetching
    Document,
    /// Already visited or queued
    Duplicate,
    /// Deeper than the depth cap
    TooDeep,
    /// Carries the sentinel fragment
    Sentinel,
    /// Host lies outside the origin
    OutOfScope,
    /// Classified as reject
    Rejected,
}

impl Admission {
    /// Returns true if the URL became part of the crawl
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Queued | Self::Document)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Document => "document",
            Self::Duplicate => "duplicate",
            Self::TooDeep => "too_deep",
            Self::Sentinel => "sentinel",
            Self::OutOfScope => "out_of_scope",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frontier manages the queue and membership sets of a single seed crawl
///
/// The frontier guarantees:
/// - A URL is never in both Visited and Queued
/// - A URL is returned by `pop_next` at most once
/// - Only in-scope, non-sentinel, non-rejected URLs within the depth cap are queued
pub struct Frontier {
    /// Host every admitted URL must belong to
    origin: String,

    /// FIFO queue of URLs to fetch
    queue: VecDeque<FrontierEntry>,

    /// URLs scheduled but not yet resolved, including one whose fetch is outstanding
    queued: HashSet<NormalizedUrl>,

    /// URLs dispatched and resolved, plus documents recorded without a fetch
    visited: HashSet<NormalizedUrl>,

    settings: Arc<CrawlSettings>,
}

impl Frontier {
    /// Creates an empty frontier for an origin
    ///
    /// # Arguments
    ///
    /// * `origin` - Host of the normalized seed
    /// * `settings` - Shared classification and depth settings
    pub fn new(origin: impl Into<String>, settings: Arc<CrawlSettings>) -> Self {
        Self {
            origin: origin.into(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            settings,
        }
    }

    /// The origin this frontier is confined to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Offers a discovered URL to the frontier
    ///
    /// Checks run in order: duplicate, depth cap, sentinel fragment, scope,
    /// classification. A document is moved straight to Visited.
    pub fn enqueue(&mut self, url: NormalizedUrl, depth: u32) -> Admission {
        if let Some(rejection) = self.precheck(&url, depth) {
            return rejection;
        }

        match self.settings.classifier.classify(&url) {
            UrlClass::Reject => Admission::Rejected,
            UrlClass::Document => {
                self.visited.insert(url);
                Admission::Document
            }
            UrlClass::Page => {
                self.push(url, depth);
                Admission::Queued
            }
        }
    }

    /// Admits the seed at depth 0
    ///
    /// The seed goes through the same checks as `enqueue` except that an
    /// unrecognized extension does not reject it.
    pub fn seed(&mut self, url: NormalizedUrl) -> Admission {
        if let Some(rejection) = self.precheck(&url, 0) {
            return rejection;
        }

        if self.settings.classifier.is_excluded(&url) {
            return Admission::Rejected;
        }

        match self.settings.classifier.classify(&url) {
            UrlClass::Document => {
                self.visited.insert(url);
                Admission::Document
            }
            UrlClass::Page | UrlClass::Reject => {
                self.push(url, 0);
                Admission::Queued
            }
        }
    }

    /// Pushes entries from another source, deduplicating only
    ///
    /// Returns the number of entries that were queued.
    pub fn preload<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = FrontierEntry>,
    {
        let mut added = 0;
        for entry in entries {
            if self.state_of(&entry.url).is_known() {
                continue;
            }
            self.push(entry.url, entry.depth);
            added += 1;
        }
        added
    }

    /// Removes the head of the queue
    ///
    /// The URL stays in Queued until `mark_visited` is called.
    pub fn pop_next(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Moves a URL from Queued to Visited
    pub fn mark_visited(&mut self, url: &NormalizedUrl) {
        match self.queued.take(url) {
            Some(owned) => {
                self.visited.insert(owned);
            }
            None => {
                self.visited.insert(url.clone());
            }
        }
    }

    /// Current state of a URL in this crawl
    pub fn state_of(&self, url: &NormalizedUrl) -> UrlState {
        if self.visited.contains(url) {
            UrlState::Visited
        } else if self.queued.contains(url) {
            UrlState::Queued
        } else {
            UrlState::Unseen
        }
    }

    /// Returns the number of URLs waiting to be popped
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs in Visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs in Queued
    pub fn queued_count(&self) -> usize {
        self.queued.len()
    }

    fn precheck(&self, url: &NormalizedUrl, depth: u32) -> Option<Admission> {
        if self.state_of(url).is_known() {
            return Some(Admission::Duplicate);
        }
        if self.settings.depth_cap.is_some_and(|cap| depth > cap) {
            return Some(Admission::TooDeep);
        }
        if self.settings.sentinel.matches(url) {
            return Some(Admission::Sentinel);
        }
        if !in_scope(url, &self.origin) {
            return Some(Admission::OutOfScope);
        }
        None
    }

    fn push(&mut self, url: NormalizedUrl, depth: u32) {
        tracing::trace!("Queued {} at depth {}", url, depth);
        self.queued.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
    }
}
