/// Checks if a host matches a host pattern
///
/// Two kinds of patterns are supported:
/// 1. Exact match: "en.wikipedia.org" matches only that host
/// 2. Wildcard match: "*.wikipedia.org" matches "wikipedia.org" and any of
///    its subdomains
///
/// Comparison is case-insensitive.
///
/// # Examples
///
/// ```
/// use corpus_scraper::url::host_matches;
///
/// assert!(host_matches("*.wikipedia.org", "en.wikipedia.org"));
/// assert!(host_matches("*.wikipedia.org", "wikipedia.org"));
/// assert!(!host_matches("*.wikipedia.org", "wikipedia.org.evil.com"));
/// assert!(host_matches("127.0.0.1", "127.0.0.1"));
/// ```
pub fn host_matches(pattern: &str, host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}

/// Returns true when the host matches at least one of the patterns
pub fn matches_any<S: AsRef<str>>(patterns: &[S], host: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| host_matches(pattern.as_ref(), host))
}
