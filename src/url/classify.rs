use crate::config::{ClassifyConfig, SentinelMatch};
use crate::url::NormalizedUrl;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// What a discovered URL is to the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlClass {
    /// Navigable page, fetched and mined for more links
    Page,
    /// Downloadable document, recorded but never fetched
    Document,
    /// Anything else, dropped
    Reject,
}

impl UrlClass {
    /// Returns true if the URL is followed for further links
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::Page)
    }
}

impl fmt::Display for UrlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Page => "page",
            Self::Document => "document",
            Self::Reject => "reject",
        };
        f.write_str(label)
    }
}

/// Labels normalized URLs as page, document or reject
#[derive(Debug, Clone)]
pub struct Classifier {
    document_extensions: HashSet<String>,
    page_extensions: HashSet<String>,
    exclude_patterns: Vec<Regex>,
    split_documents: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        let config = ClassifyConfig::default();
        Self {
            document_extensions: extension_set(&config.document_extensions),
            page_extensions: extension_set(&config.page_extensions),
            exclude_patterns: Vec::new(),
            split_documents: config.split_documents,
        }
    }
}

impl Classifier {
    /// Builds a classifier, compiling every exclusion pattern
    pub fn new(config: &ClassifyConfig) -> Result<Self, ConfigError> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            document_extensions: extension_set(&config.document_extensions),
            page_extensions: extension_set(&config.page_extensions),
            exclude_patterns,
            split_documents: config.split_documents,
        })
    }

    /// Returns true if documents are kept out of traversal
    pub fn splits_documents(&self) -> bool {
        self.split_documents
    }

    /// Classifies a normalized URL
    ///
    /// # Rules
    ///
    /// | Condition | Class |
    /// |-----------|-------|
    /// | matches an exclusion pattern | Reject |
    /// | path ends in `/` or last segment has no `.` | Page |
    /// | document extension, splitting on | Document |
    /// | document extension, splitting off | Page |
    /// | page-like extension | Page |
    /// | any other extension | Reject |
    pub fn classify(&self, url: &NormalizedUrl) -> UrlClass {
        if self.is_excluded(url) {
            return UrlClass::Reject;
        }

        let Some(ext) = extension(url.path()) else {
            return UrlClass::Page;
        };

        if self.document_extensions.contains(&ext) {
            if self.split_documents {
                UrlClass::Document
            } else {
                UrlClass::Page
            }
        } else if self.page_extensions.contains(&ext) {
            UrlClass::Page
        } else {
            UrlClass::Reject
        }
    }

    /// Returns true if an exclusion pattern matches anywhere in the URL
    pub fn is_excluded(&self, url: &NormalizedUrl) -> bool {
        self.exclude_patterns
            .iter()
            .any(|re| re.is_match(url.as_str()))
    }
}

/// Lowercase extension of the final path segment, `None` for directory-like paths
fn extension(path: &str) -> Option<String> {
    let last = path.rsplit('/').next().unwrap_or("");
    // `;params` hang off the last segment and are not part of the name
    let last = last.split(';').next().unwrap_or("");

    last.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

fn extension_set(extensions: &[String]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

/// Detects the reserved fragment a site uses for client-side pagination
///
/// The marker is compared case-insensitively, without its leading `#`.
#[derive(Debug, Clone)]
pub struct SentinelFilter {
    marker: String,
    mode: SentinelMatch,
}

impl Default for SentinelFilter {
    fn default() -> Self {
        Self::new("page", SentinelMatch::Exact)
    }
}

impl SentinelFilter {
    pub fn new(marker: &str, mode: SentinelMatch) -> Self {
        Self {
            marker: marker.trim_start_matches('#').to_lowercase(),
            mode,
        }
    }

    /// Returns true if the URL carries the sentinel fragment
    pub fn matches(&self, url: &NormalizedUrl) -> bool {
        let Some(fragment) = url.fragment() else {
            return false;
        };
        let fragment = fragment.to_lowercase();

        match self.mode {
            SentinelMatch::Exact => fragment == self.marker,
            SentinelMatch::Prefix => fragment.starts_with(&self.marker),
        }
    }
}
