//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files, and answers whether a URL may be fetched.
//!
//! # Fetch policy
//!
//! | robots.txt response | Rules used |
//! |---------------------|------------|
//! | 2xx | parsed body |
//! | 4xx | allow all (the site has no robots.txt) |
//! | 5xx, network error, timeout | [`RobotsFailurePolicy`]: allow all (default) or disallow all |

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache, RobotsSource};
pub use parser::ParsedRobots;

use crate::config::{Config, RobotsConfig, RobotsFailurePolicy};
use crate::crawler::Fetcher;
use std::time::Duration;
use url::Url;

/// Returns the robots.txt URL for the origin of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}

/// Fetches and parses robots.txt for the origin of `url`
///
/// Never fails: an unreachable robots.txt resolves to the failure policy.
pub async fn fetch_robots(
    fetcher: &mut Fetcher,
    url: &Url,
    policy: RobotsFailurePolicy,
) -> CachedRobots {
    let unavailable = || {
        let rules = match policy {
            RobotsFailurePolicy::Allow => ParsedRobots::allow_all(),
            RobotsFailurePolicy::Deny => ParsedRobots::disallow_all(),
        };
        CachedRobots::new(rules, RobotsSource::Unavailable)
    };

    let Some(robots_url) = robots_url(url) else {
        return unavailable();
    };

    tracing::debug!("Fetching robots.txt: {}", robots_url);
    let response = match fetcher.get(&robots_url, None).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {} (policy: {:?})", robots_url, e, policy);
            return unavailable();
        }
    };

    let status = response.status();
    if status.is_client_error() {
        tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, status.as_u16());
        return CachedRobots::new(ParsedRobots::allow_all(), RobotsSource::Missing);
    }

    if !status.is_success() {
        tracing::warn!(
            "robots.txt at {} returned HTTP {} (policy: {:?})",
            robots_url,
            status.as_u16(),
            policy
        );
        return unavailable();
    }

    match response.text().await {
        Ok(body) => CachedRobots::new(ParsedRobots::from_content(&body), RobotsSource::Fetched),
        Err(e) => {
            tracing::warn!("Failed to read {}: {} (policy: {:?})", robots_url, e, policy);
            unavailable()
        }
    }
}

/// Answers robots.txt questions for the whole run
///
/// Rules are cached per origin, so each site's robots.txt is requested once.
pub struct RobotsChecker {
    cache: RobotsCache,
    /// Product token matched against robots.txt user-agent groups
    agent: String,
    policy: RobotsFailurePolicy,
    /// Longest Crawl-delay honoured
    max_crawl_delay: Duration,
}

impl RobotsChecker {
    pub fn new(agent: impl Into<String>, policy: RobotsFailurePolicy) -> Self {
        Self {
            cache: RobotsCache::new(),
            agent: agent.into(),
            policy,
            max_crawl_delay: RobotsConfig::default().max_crawl_delay(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.user_agent.product_token(),
            config.robots.on_fetch_failure,
        )
        .with_max_crawl_delay(config.robots.max_crawl_delay())
    }

    pub fn with_max_crawl_delay(mut self, max: Duration) -> Self {
        self.max_crawl_delay = max;
        self
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Number of origins whose robots.txt has been resolved
    pub fn origins_checked(&self) -> usize {
        self.cache.len()
    }

    /// Checks whether `url` may be fetched, fetching robots.txt if needed
    pub async fn is_allowed(&mut self, fetcher: &mut Fetcher, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();

        if self.cache.get(&origin).is_none() {
            let robots = fetch_robots(fetcher, url, self.policy).await;
            tracing::debug!("robots.txt for {} resolved as {:?}", origin, robots.source);
            self.cache.insert(origin.clone(), robots);
        } else {
            tracing::trace!("Using cached robots.txt for {}", origin);
        }

        match self.cache.get(&origin) {
            Some(robots) => robots.is_allowed(url.as_str(), &self.agent),
            None => self.policy == RobotsFailurePolicy::Allow,
        }
    }

    /// Crawl delay requested by the origin of `url`, if already known
    pub fn crawl_delay(&self, url: &Url) -> Option<Duration> {
        self.cache
            .get(&url.origin().ascii_serialization())
            .and_then(|robots| robots.crawl_delay(&self.agent, self.max_crawl_delay))
    }
}
