use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "mc_cid", "_hsenc", "_hsmi"];

/// Normalizes a URL into the form used for fetching and the visited set
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed (the parser lowercases the host and
///    resolves `.`/`..` path segments)
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Remove the fragment
/// 5. Remove tracking query parameters (`utm_*`, `fbclid`, ...), keeping the
///    order of the remaining ones
/// 6. Remove an empty query string
///
/// Scheme, port, `www.` prefixes and trailing slashes are left untouched:
/// they can change what a server returns.
///
/// # Examples
///
/// ```
/// use corpus_scraper::url::normalize_url;
///
/// let url = normalize_url("https://Example.COM/page?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(input: &str) -> String {
        normalize_url(input).unwrap().to_string()
    }

    #[test]
    fn test_scheme_and_trailing_slash_kept() {
        assert_eq!(normalized("http://blog.example.org/post/"), "http://blog.example.org/post/");
    }

    #[test]
    fn test_fragment_dropped() {
        assert_eq!(
            normalized("https://en.wikipedia.org/wiki/Rust#History"),
            "https://en.wikipedia.org/wiki/Rust"
        );
    }

    #[test]
    fn test_tracking_only_query_dropped() {
        assert_eq!(
            normalized("https://news.example.org/story?utm_campaign=spring&gclid=abc"),
            "https://news.example.org/story"
        );
    }

    #[test]
    fn test_other_params_survive_in_order() {
        assert_eq!(
            normalized("https://shop.example.org/list?page=2&utm_source=mail&sort=asc&_hsenc=x"),
            "https://shop.example.org/list?page=2&sort=asc"
        );
    }

    #[test]
    fn test_parser_normalization() {
        assert_eq!(normalized("HTTPS://Docs.Example.ORG/A/./b/../C"), "https://docs.example.org/A/C");
        assert_eq!(normalized("https://docs.example.org"), "https://docs.example.org/");
        assert_eq!(normalized("\t https://docs.example.org/x \n"), "https://docs.example.org/x");
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(matches!(normalize_url("mailto:someone@example.org"), Err(UrlError::InvalidScheme(_))));
        assert!(matches!(normalize_url("ftp://files.example.org/a"), Err(UrlError::InvalidScheme(_))));
        assert!(matches!(normalize_url("just words"), Err(UrlError::Parse(_))));
        assert!(matches!(normalize_url("/wiki/Rust"), Err(UrlError::Parse(_))));
    }
}
