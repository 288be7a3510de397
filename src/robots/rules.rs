//! Robots.txt rules backed by the robotstxt crate

use robotstxt::DefaultMatcher;

/// Rules of one robots.txt file
///
/// Holds the raw body; the robotstxt matcher is run per check. A body that is
/// empty or unparsable allows everything.
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    body: Option<String>,
}

impl RobotsRules {
    /// Rules parsed from a robots.txt body
    pub fn from_body(body: &str) -> Self {
        let body = body.trim();
        Self {
            body: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Rules that allow every URL
    ///
    /// Used whenever robots.txt is missing or could not be fetched.
    pub fn permissive() -> Self {
        Self { body: None }
    }

    /// Returns true if no rule can ever block a URL
    pub fn is_permissive(&self) -> bool {
        self.body.is_none()
    }

    /// Checks if a URL is allowed for a user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The full user agent string; only its product token
    ///   (`OriginSweep` in `OriginSweep/0.1 (+...)`) is matched
    pub fn allows(&self, url: &str, user_agent: &str) -> bool {
        let Some(body) = &self.body else {
            return true;
        };

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(body, product_token(user_agent), url)
    }
}

/// Product token of a user agent string, the part before the first `/` or space
pub fn product_token(user_agent: &str) -> &str {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or(user_agent)
}
