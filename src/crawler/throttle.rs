//! Request throttling
//!
//! Every HTTP request the scraper makes goes through a single [`Throttle`],
//! which guarantees a minimum spacing between the start of consecutive
//! requests. The spacing is fixed, not adaptive: the configured delay, raised
//! to a site's robots.txt `Crawl-delay` when that is longer, plus an optional
//! random jitter.

use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Enforces the minimum delay between consecutive requests
#[derive(Debug)]
pub struct Throttle {
    /// Configured minimum spacing
    min_interval: Duration,

    /// Upper bound of the random extra spacing
    jitter: Duration,

    /// Start time of the previous request
    last_request_time: Option<Instant>,

    /// Number of requests released so far
    request_count: u64,
}

impl Throttle {
    pub fn new(min_interval: Duration, jitter: Duration) -> Self {
        Self {
            min_interval,
            jitter,
            last_request_time: None,
            request_count: 0,
        }
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Calculates how long to wait before the next request may start
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self, interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= interval {
            None
        } else {
            Some(interval - elapsed)
        }
    }

    /// Sleeps until the next request may start, then records it
    ///
    /// # Arguments
    ///
    /// * `crawl_delay` - A site-specific delay (robots.txt `Crawl-delay`);
    ///   the longer of this and the configured delay applies
    pub async fn wait(&mut self, crawl_delay: Option<Duration>) {
        let mut interval = self.min_interval.max(crawl_delay.unwrap_or_default());
        if self.last_request_time.is_some() {
            interval = interval.saturating_add(self.sample_jitter());
        }

        if let Some(wait) = self.time_until_next_request(interval, Instant::now()) {
            tracing::trace!("Throttling for {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        self.last_request_time = Some(Instant::now());
        self.request_count += 1;
    }

    fn sample_jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let secs = rand::rng().random_range(0.0..self.jitter.as_secs_f64());
        Duration::try_from_secs_f64(secs).unwrap_or(self.jitter)
    }
}
