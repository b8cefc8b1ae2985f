use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent when nothing else is configured
pub const DEFAULT_USER_AGENT: &str =
    "RAG-Course-Scraper/1.0 (+https://example.edu; contact=student@example.com)";

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub robots: RobotsConfig,
    pub extract: ExtractConfig,
    pub wikipedia: WikipediaConfig,
    pub output: OutputConfig,
}

/// Budget and politeness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Corpus size budget in bytes
    #[serde(rename = "max-total-bytes")]
    pub max_total_bytes: u64,

    /// Minimum time between two consecutive requests (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Upper bound of the random delay added on top of `delay-seconds`
    #[serde(rename = "jitter-seconds")]
    pub jitter_seconds: f64,

    /// HTTP request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_total_bytes: 1_200_000,
            delay_seconds: 2.0,
            jitter_seconds: 1.0,
            timeout_seconds: 20,
        }
    }
}

impl ScraperConfig {
    pub fn delay(&self) -> Duration {
        seconds(self.delay_seconds)
    }

    pub fn jitter(&self) -> Duration {
        seconds(self.jitter_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Shallow crawling settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Follow links found on seed pages
    pub enabled: bool,

    /// Maximum number of extra links followed per seed
    #[serde(rename = "max-follow")]
    pub max_follow: usize,

    /// Only follow links on the seed's own host
    #[serde(rename = "same-domain")]
    pub same_domain: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_follow: 5,
            same_domain: false,
        }
    }
}

/// Request identification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en;q=0.9,pl;q=0.8".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Returns the product token used to match robots.txt groups
    ///
    /// `RAG-Course-Scraper/1.0 (+https://...)` becomes `RAG-Course-Scraper`.
    pub fn product_token(&self) -> &str {
        let token = self
            .user_agent
            .split(|c: char| c == '/' || c.is_whitespace())
            .next()
            .unwrap_or("");
        if token.is_empty() {
            "*"
        } else {
            token
        }
    }
}

/// What to assume when robots.txt cannot be retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsFailurePolicy {
    /// Treat the site as fully crawlable (fail-open)
    #[default]
    Allow,
    /// Treat the site as fully disallowed (fail-closed)
    Deny,
}

/// Robots.txt handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Applied on network errors, timeouts and 5xx responses
    #[serde(rename = "on-fetch-failure")]
    pub on_fetch_failure: RobotsFailurePolicy,

    /// Longest `Crawl-delay` honoured (seconds); longer values are clamped
    #[serde(rename = "max-crawl-delay-seconds")]
    pub max_crawl_delay_seconds: f64,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            on_fetch_failure: RobotsFailurePolicy::default(),
            max_crawl_delay_seconds: 60.0,
        }
    }
}

impl RobotsConfig {
    pub fn max_crawl_delay(&self) -> Duration {
        seconds(self.max_crawl_delay_seconds)
    }
}

/// Main-content extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Extracted text shorter than this counts as a failed extraction
    #[serde(rename = "min-text-chars")]
    pub min_text_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_text_chars: 300 }
    }
}

/// Wikipedia API fast-path
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub enabled: bool,

    /// Host patterns served by the MediaWiki API (e.g., "*.wikipedia.org")
    pub domains: Vec<String>,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            domains: vec!["*.wikipedia.org".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the `.txt` corpus files
    #[serde(rename = "out-dir")]
    pub out_dir: PathBuf,

    /// Append-only status log
    #[serde(rename = "log-path")]
    pub log_path: PathBuf,

    /// Cut the last document so the corpus never exceeds the budget
    #[serde(rename = "truncate-to-budget")]
    pub truncate_to_budget: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("corpus"),
            log_path: PathBuf::from("logs/scrape.log"),
            truncate_to_budget: true,
        }
    }
}

/// Converts a number of seconds to a Duration
///
/// Negative and NaN values become zero, values too large for a Duration
/// saturate. Validation rejects both before a run starts.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}
