//! Seed file loading
//!
//! A seeds file holds one URL per line. Blank lines and lines starting with
//! `#` are ignored:
//!
//! ```text
//! # Encyclopedia
//! https://en.wikipedia.org/wiki/Information_retrieval
//!
//! https://example.com/blog/post
//! ```

use crate::url::normalize_url;
use crate::ConfigError;
use std::fs;
use std::path::Path;
use url::Url;

/// Loads seed URLs from a file
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read. Invalid lines are
/// logged and skipped.
pub fn load_seeds(path: &Path) -> Result<Vec<Url>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let seeds = parse_seeds(&content);
    tracing::info!("Loaded {} seed URLs from {}", seeds.len(), path.display());
    Ok(seeds)
}

/// Parses seed URLs from the contents of a seeds file
///
/// Order is preserved and duplicates are kept.
pub fn parse_seeds(content: &str) -> Vec<Url> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            match normalize_url(line) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Skipping seed on line {}: '{}' ({})", index + 1, line, e);
                    None
                }
            }
        })
        .collect()
}
