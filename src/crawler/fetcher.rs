//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with the configured user agent
//! - Throttling every request through one [`Throttle`]
//! - GET requests for page content
//! - Error classification (network, HTTP status, non-HTML content)
//!
//! There are no retries: a failed request is reported once and the URL is
//! skipped.

use crate::config::Config;
use crate::crawler::throttle::Throttle;
use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-2xx response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use corpus_scraper::config::Config;
/// use corpus_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();
    if !config.user_agent.accept_language.is_empty() {
        let language = HeaderValue::from_str(&config.user_agent.accept_language)
            .map_err(|e| crate::ConfigError::Validation(format!("accept_language: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    let client = Client::builder()
        .user_agent(config.user_agent.user_agent.clone())
        .default_headers(headers)
        .timeout(config.scraper.timeout())
        .connect_timeout(Duration::from_secs(10).min(config.scraper.timeout()))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Returns true for Content-Type values that carry HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Throttled HTTP client shared by every component that talks to the network
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
}

impl Fetcher {
    /// Creates a fetcher from the scraper configuration
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let client = build_http_client(config)?;
        let throttle = Throttle::new(config.scraper.delay(), config.scraper.jitter());
        Ok(Self::with_client(client, throttle))
    }

    pub fn with_client(client: Client, throttle: Throttle) -> Self {
        Self { client, throttle }
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Sends a throttled GET request
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `crawl_delay` - Site-specific minimum delay from robots.txt, if any
    pub async fn get(
        &mut self,
        url: &Url,
        crawl_delay: Option<Duration>,
    ) -> Result<Response, reqwest::Error> {
        self.throttle.wait(crawl_delay).await;
        tracing::debug!("GET {}", url);
        self.client.get(url.clone()).send().await
    }

    /// Fetches an HTML page
    ///
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Connection refused, DNS, TLS, timeout | NetworkError |
    /// | Non-2xx status | HttpError |
    /// | 2xx, Content-Type not HTML | ContentMismatch |
    /// | 2xx HTML, body unreadable | NetworkError |
    /// | 2xx HTML | Success |
    ///
    /// Redirects are followed by the client.
    pub async fn fetch_page(&mut self, url: &Url, crawl_delay: Option<Duration>) -> FetchResult {
        let response = match self.get(url, crawl_delay).await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return FetchResult::ContentMismatch { content_type };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => classify_error(&e),
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
