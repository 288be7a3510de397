use crate::url::NormalizedUrl;

/// Checks if a host belongs to an origin
///
/// A host is inside the origin when it equals it or is one of its subdomains:
/// "example.edu" covers:
///    - "example.edu" (the origin itself)
///    - "news.example.edu" (single subdomain)
///    - "api.v2.example.edu" (nested subdomains)
///
/// An empty host or origin never matches, so degenerate URLs fall out of scope.
///
/// # Examples
///
/// ```
/// use origin_sweep::url::in_origin;
///
/// assert!(in_origin("example.edu", "example.edu"));
/// assert!(in_origin("news.example.edu", "example.edu"));
/// assert!(!in_origin("myexample.edu", "example.edu"));
/// assert!(!in_origin("example.edu", "news.example.edu"));
/// ```
pub fn in_origin(host: &str, origin: &str) -> bool {
    if host.is_empty() || origin.is_empty() {
        return false;
    }

    host == origin
        || host
            .strip_suffix(origin)
            .is_some_and(|head| head.ends_with('.'))
}

/// Returns true if a normalized URL lies inside the origin
pub fn in_scope(url: &NormalizedUrl, origin: &str) -> bool {
    in_origin(url.host(), origin)
}
