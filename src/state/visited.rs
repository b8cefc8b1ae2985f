use std::collections::HashSet;
use url::Url;

/// URLs already attempted during this run
///
/// Keys are normalized URLs (see [`crate::url::normalize_url`]), so
/// `https://example.com/a#top` and `https://example.com/a` are the same entry.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a URL; returns false if it was already present
    pub fn insert(&mut self, url: &Url) -> bool {
        self.seen.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
