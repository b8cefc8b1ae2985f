//! Crawler module for page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - Throttled HTTP fetching
//! - The Wikipedia API fast-path
//! - HTML link extraction for shallow crawling
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod throttle;
mod wikipedia;

pub use coordinator::{run_scrape, Coordinator};
pub use fetcher::{build_http_client, is_html_content_type, FetchResult, Fetcher};
pub use parser::{discover_links, extract_links};
pub use throttle::Throttle;
pub use wikipedia::{
    extracts_api_url, fetch_wikipedia_plain, summary_api_url, wiki_title, WikiDocument,
};
