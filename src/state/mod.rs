//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UrlState`: Tracks where a URL is within one seed's crawl (unseen, queued, visited)

mod url_state;

// Re-export main types
pub use url_state::UrlState;
