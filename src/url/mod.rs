//! URL handling module for Origin-Sweep
//!
//! This module provides URL normalization, origin scoping, page/document
//! classification and the sentinel-fragment filter.

mod classify;
mod normalize;
mod scope;

// Re-export main types
pub use classify::{Classifier, SentinelFilter, UrlClass};
pub use normalize::{NormalizedUrl, Normalizer};
pub use scope::{in_origin, in_scope};
