//! Link discovery for shallow crawling
//!
//! This module handles parsing HTML content to extract the links a seed page
//! points to, and selecting the few that will be followed.

use crate::state::VisitedSet;
use crate::url::{normalize_url, same_host};
use rand::seq::SliceRandom;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts all followable links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not http(s) after resolution
///
/// Links are resolved against `base_url`, normalized and de-duplicated,
/// keeping document order.
///
/// # Example
///
/// ```
/// use corpus_scraper::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    normalize_url(absolute_url.as_str()).ok()
}

/// Selects the links to follow from a seed page
///
/// # Arguments
///
/// * `html` - The seed page's HTML
/// * `page_url` - The URL the HTML was served from, after redirects
/// * `max_follow` - Upper bound on the number of returned URLs
/// * `host_scope` - When set, only links on this URL's host are kept
/// * `visited` - URLs already attempted; these are never returned
///
/// The candidates are shuffled before truncation so that repeated runs do not
/// always follow the navigation links at the top of the page.
pub fn discover_links(
    html: &str,
    page_url: &Url,
    max_follow: usize,
    host_scope: Option<&Url>,
    visited: &VisitedSet,
) -> Vec<Url> {
    if max_follow == 0 {
        return Vec::new();
    }

    let page_key = normalize_url(page_url.as_str()).ok();

    let mut candidates: Vec<Url> = extract_links(html, page_url)
        .into_iter()
        .filter(|link| Some(link) != page_key.as_ref())
        .filter(|link| !visited.contains(link))
        .filter(|link| host_scope.map_or(true, |scope| same_host(link, scope)))
        .collect();

    candidates.shuffle(&mut rand::rng());
    candidates.truncate(max_follow);
    candidates
}
