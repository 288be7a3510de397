use std::fmt;
use std::sync::Arc;

/// Scheme every normalized URL carries
const FORCED_SCHEME: &str = "https";

/// A URL in canonical form
///
/// The text is shared, so cloning only bumps a reference count. Equality is
/// byte equality of the canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Arc<str>);

impl NormalizedUrl {
    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase host without userinfo or port; empty for degenerate input
    pub fn host(&self) -> &str {
        host_of(split_raw(&self.0).netloc)
    }

    /// Path including any `;params`
    pub fn path(&self) -> &str {
        split_raw(&self.0).path
    }

    /// Query string without the leading `?`
    pub fn query(&self) -> Option<&str> {
        split_raw(&self.0).query
    }

    /// Fragment without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        split_raw(&self.0).fragment
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NormalizedUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Canonicalizes raw URL strings
///
/// # Normalization Steps
///
/// 1. Split into scheme, authority, path, query and fragment without
///    rejecting anything
/// 2. Force the scheme to `https`
/// 3. Lowercase the host
/// 4. Strip the configured prefix label (default `www.`) from the host,
///    unless the host is exempt; repeated until the prefix is gone
/// 5. Keep path, params, query and fragment byte-for-byte
///
/// Input without an authority ends up with an empty host, which no origin
/// ever matches.
///
/// # Examples
///
/// ```
/// use origin_sweep::url::Normalizer;
///
/// let normalizer = Normalizer::default();
/// let url = normalizer.normalize("http://WWW.Example.edu/a?x=1#top");
/// assert_eq!(url.as_str(), "https://example.edu/a?x=1#top");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    strip_prefix: String,
    exempt_hosts: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("www.", Vec::new())
    }
}

impl Normalizer {
    /// Creates a normalizer; an empty `strip_prefix` disables stripping
    pub fn new(strip_prefix: impl Into<String>, exempt_hosts: Vec<String>) -> Self {
        Self {
            strip_prefix: strip_prefix.into().to_lowercase(),
            exempt_hosts: exempt_hosts.into_iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    /// Normalizes a raw URL string
    pub fn normalize(&self, raw: &str) -> NormalizedUrl {
        let parts = split_raw(raw.trim());

        let netloc = self.normalize_netloc(parts.netloc);

        let mut out = String::with_capacity(raw.len() + FORCED_SCHEME.len());
        out.push_str(FORCED_SCHEME);
        out.push_str("://");
        out.push_str(&netloc);

        // Without an authority the path must stay rooted, or a second pass
        // would read its first segment as a host
        if netloc.is_empty() && !parts.path.is_empty() && !parts.path.starts_with('/') {
            out.push('/');
        }
        out.push_str(parts.path);

        if let Some(query) = parts.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = parts.fragment {
            out.push('#');
            out.push_str(fragment);
        }

        NormalizedUrl(Arc::from(out))
    }

    /// Returns true if the host keeps its prefix label
    pub fn is_exempt(&self, host: &str) -> bool {
        self.exempt_hosts
            .iter()
            .any(|exempt| super::in_origin(host, exempt))
    }

    fn normalize_netloc(&self, netloc: &str) -> String {
        let (userinfo, host_port) = match netloc.rfind('@') {
            Some(at) => netloc.split_at(at + 1),
            None => ("", netloc),
        };
        let host = host_of(host_port);
        let port = &host_port[host.len()..];

        let lowered = host.to_lowercase();
        let mut host: &str = &lowered;
        if !self.strip_prefix.is_empty() {
            while !self.is_exempt(host) {
                match host.strip_prefix(self.strip_prefix.as_str()) {
                    // A leading `[` would be read back as an IPv6 literal
                    // and split from its port differently
                    Some(rest) if !rest.starts_with('[') => host = rest,
                    _ => break,
                }
            }
        }

        format!("{}{}{}", userinfo, host, port)
    }
}

/// Borrowed pieces of a raw URL string
#[derive(Debug, Default, PartialEq, Eq)]
struct RawParts<'a> {
    netloc: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

/// Splits a URL the way browsers read an `href`, never failing
fn split_raw(raw: &str) -> RawParts<'_> {
    let rest = strip_scheme(raw);

    let (rest, fragment) = match rest.split_once('#') {
        Some((before, after)) => (before, Some(after)),
        None => (rest, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((before, after)) => (before, Some(after)),
        None => (rest, None),
    };

    let (netloc, path) = match rest.strip_prefix("//") {
        Some(authority) => match authority.find('/') {
            Some(slash) => authority.split_at(slash),
            None => (authority, ""),
        },
        None => ("", rest),
    };

    RawParts {
        netloc,
        path,
        query,
        fragment,
    }
}

/// Drops a leading `scheme:` if one is present
fn strip_scheme(raw: &str) -> &str {
    let Some(colon) = raw.find(':') else {
        return raw;
    };
    let scheme = &raw[..colon];
    let valid = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid {
        &raw[colon + 1..]
    } else {
        raw
    }
}

/// Host portion of `host[:port]` (userinfo already removed or absent)
fn host_of(netloc: &str) -> &str {
    let host_port = match netloc.rfind('@') {
        Some(at) => &netloc[at + 1..],
        None => netloc,
    };

    if host_port.starts_with('[') {
        // IPv6 literal keeps its brackets
        return match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        };
    }

    match host_port.rfind(':') {
        Some(colon) => &host_port[..colon],
        None => host_port,
    }
}
