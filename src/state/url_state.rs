/// URL state definitions for tracking crawl progress
///
/// Every normalized URL a crawl has heard of is in exactly one of these states.
use std::fmt;

/// Represents the current state of a URL within one seed's crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UrlState {
    /// URL has not been admitted
    #[default]
    Unseen,

    /// URL is waiting in the frontier
    Queued,

    /// URL has been dispatched (or recorded as a document); terminal
    Visited,
}

impl UrlState {
    /// Returns true if the URL has been admitted and will never be enqueued again
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unseen)
    }

    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Returns true if the URL is still pending in the frontier
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Queued => "queued",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
