//! Robots.txt caching implementation
//!
//! robots.txt is fetched at most once per origin per run; later lookups for
//! the same origin are served from this cache.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::time::Duration;

/// How the cached rules were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsSource {
    /// robots.txt was fetched and parsed
    Fetched,
    /// The site has no robots.txt (4xx response)
    Missing,
    /// robots.txt could not be retrieved; the failure policy applied
    Unavailable,
}

/// Cached robots.txt data for an origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub content: ParsedRobots,

    /// How the rules were obtained
    pub source: RobotsSource,
}

impl CachedRobots {
    pub fn new(content: ParsedRobots, source: RobotsSource) -> Self {
        Self { content, source }
    }

    /// Checks if a URL is allowed according to the cached robots.txt
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.content.is_allowed(url, user_agent)
    }

    /// Gets the crawl delay from the cached robots.txt, capped at `max`
    ///
    /// Negative and NaN values are ignored.
    pub fn crawl_delay(&self, user_agent: &str, max: Duration) -> Option<Duration> {
        let secs = self
            .content
            .crawl_delay(user_agent)
            .filter(|secs| *secs >= 0.0)?;

        match Duration::try_from_secs_f64(secs) {
            Ok(delay) if delay <= max => Some(delay),
            _ => {
                tracing::warn!("Crawl-delay of {}s clamped to {:?}", secs, max);
                Some(max)
            }
        }
    }
}

/// Per-origin robots.txt cache for the lifetime of a run
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &str) -> Option<&CachedRobots> {
        self.entries.get(origin)
    }

    pub fn insert(&mut self, origin: String, robots: CachedRobots) {
        self.entries.insert(origin, robots);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_delegates_to_content() {
        let cache = CachedRobots::new(ParsedRobots::allow_all(), RobotsSource::Missing);
        assert!(cache.is_allowed("https://example.com/any/path", "TestBot"));

        let cache = CachedRobots::new(ParsedRobots::disallow_all(), RobotsSource::Unavailable);
        assert!(!cache.is_allowed("https://example.com/any/path", "TestBot"));
    }

    #[test]
    fn test_crawl_delay_as_duration() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 1.5");
        let cache = CachedRobots::new(robots, RobotsSource::Fetched);
        assert_eq!(
            cache.crawl_delay("TestBot", Duration::from_secs(60)),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_negative_crawl_delay_ignored() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: -3");
        let cache = CachedRobots::new(robots, RobotsSource::Fetched);
        assert_eq!(cache.crawl_delay("TestBot", Duration::from_secs(60)), None);
    }

    #[test]
    fn test_long_crawl_delay_clamped() {
        let max = Duration::from_secs(60);
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 86400");
        let cache = CachedRobots::new(robots, RobotsSource::Fetched);
        assert_eq!(cache.crawl_delay("TestBot", max), Some(max));
    }

    #[test]
    fn test_unrepresentable_crawl_delay_clamped() {
        let max = Duration::from_secs(60);
        for body in [
            "User-agent: *\nCrawl-delay: 1e20",
            "User-agent: *\nCrawl-delay: 99999999999999999999",
            "User-agent: *\nCrawl-delay: inf",
        ] {
            let cache = CachedRobots::new(ParsedRobots::from_content(body), RobotsSource::Fetched);
            assert_eq!(cache.crawl_delay("TestBot", max), Some(max), "{}", body);
        }
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache = RobotsCache::new();
        assert!(cache.is_empty());

        cache.insert(
            "https://example.com".to_string(),
            CachedRobots::new(ParsedRobots::allow_all(), RobotsSource::Missing),
        );

        assert_eq!(cache.len(), 1);
        let entry = cache.get("https://example.com").unwrap();
        assert_eq!(entry.source, RobotsSource::Missing);
        assert!(cache.get("https://other.com").is_none());
    }
}
