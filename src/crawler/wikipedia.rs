//! Wikipedia fast-path
//!
//! Article URLs on configured wiki hosts (`https://<lang>.wikipedia.org/wiki/<Title>`)
//! are served from the MediaWiki API as plaintext instead of being scraped:
//!
//! 1. `GET /w/api.php?action=query&prop=extracts&explaintext=1&...&titles=<Title>`
//!    returns the full article text and its canonical title
//! 2. if that yields nothing, `GET /api/rest_v1/page/summary/<Title>` returns
//!    the lead section
//!
//! Both endpoints live on the article's own origin. When neither produces
//! text, the caller falls back to the generic HTML path.

use crate::crawler::fetcher::Fetcher;
use crate::url::{extract_domain, matches_any};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Plaintext document returned by the wiki API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiDocument {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ExtractsResponse {
    query: Option<ExtractsQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractsQuery {
    #[serde(default)]
    pages: Vec<ExtractsPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractsPage {
    title: Option<String>,
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    extract: Option<String>,
}

/// Returns the article title if `url` is a wiki article on one of `domains`
///
/// The title is percent-decoded and may contain `/` (sub-pages such as
/// `AC/DC`). Query strings and fragments are ignored.
///
/// # Examples
///
/// ```
/// use corpus_scraper::crawler::wiki_title;
/// use url::Url;
///
/// let domains = vec!["*.wikipedia.org".to_string()];
/// let url = Url::parse("https://en.wikipedia.org/wiki/Caf%C3%A9").unwrap();
/// assert_eq!(wiki_title(&url, &domains), Some("Café".to_string()));
/// ```
pub fn wiki_title(url: &Url, domains: &[String]) -> Option<String> {
    let host = extract_domain(url)?;
    if !matches_any(domains, &host) {
        return None;
    }

    let raw = url.path().strip_prefix("/wiki/")?;
    let title = percent_decode_str(raw).decode_utf8_lossy();
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Builds the MediaWiki action API URL returning the article as plaintext
pub fn extracts_api_url(article_url: &Url, title: &str) -> Option<Url> {
    let mut api = article_url.join("/w/api.php").ok()?;
    api.query_pairs_mut()
        .append_pair("action", "query")
        .append_pair("prop", "extracts")
        .append_pair("explaintext", "1")
        .append_pair("redirects", "1")
        .append_pair("format", "json")
        .append_pair("formatversion", "2")
        .append_pair("titles", title);
    Some(api)
}

/// Builds the REST summary endpoint URL for an article
pub fn summary_api_url(article_url: &Url, title: &str) -> Option<Url> {
    let mut api = article_url.join("/api/rest_v1/page/summary/").ok()?;
    api.path_segments_mut().ok()?.pop_if_empty().push(title);
    Some(api)
}

/// Fetches an article as plaintext through the wiki API
///
/// Returns None when the API is unreachable, answers with an error status,
/// reports the page as missing, or returns empty text.
pub async fn fetch_wikipedia_plain(
    fetcher: &mut Fetcher,
    article_url: &Url,
    title: &str,
    crawl_delay: Option<Duration>,
) -> Option<WikiDocument> {
    if let Some(doc) = fetch_extract(fetcher, article_url, title, crawl_delay).await {
        return Some(doc);
    }

    tracing::debug!("Extracts API had no text for '{}', trying REST summary", title);
    fetch_summary(fetcher, article_url, title, crawl_delay).await
}

async fn fetch_extract(
    fetcher: &mut Fetcher,
    article_url: &Url,
    title: &str,
    crawl_delay: Option<Duration>,
) -> Option<WikiDocument> {
    let api = extracts_api_url(article_url, title)?;
    let body: ExtractsResponse = get_json(fetcher, &api, crawl_delay).await?;

    let page = body.query?.pages.into_iter().find(|page| !page.missing)?;
    document(page.title, page.extract, title)
}

async fn fetch_summary(
    fetcher: &mut Fetcher,
    article_url: &Url,
    title: &str,
    crawl_delay: Option<Duration>,
) -> Option<WikiDocument> {
    let api = summary_api_url(article_url, title)?;
    let body: SummaryResponse = get_json(fetcher, &api, crawl_delay).await?;
    document(body.title, body.extract, title)
}

async fn get_json<T: for<'de> Deserialize<'de>>(
    fetcher: &mut Fetcher,
    api: &Url,
    crawl_delay: Option<Duration>,
) -> Option<T> {
    let response = match fetcher.get(api, crawl_delay).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Wiki API request {} failed: {}", api, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Wiki API {} returned HTTP {}", api, response.status().as_u16());
        return None;
    }

    match response.json::<T>().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::warn!("Unexpected wiki API response from {}: {}", api, e);
            None
        }
    }
}

fn document(title: Option<String>, text: Option<String>, requested: &str) -> Option<WikiDocument> {
    let text = text?.trim().to_string();
    if text.is_empty() {
        return None;
    }
    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| requested.replace('_', " "));
    Some(WikiDocument { title, text })
}
