//! Budgeted corpus writer
//!
//! Writes one `.txt` file per document into the output directory and keeps
//! the running byte total below `max-total-bytes`.
//!
//! # File Format
//!
//! ```text
//! URL: https://example.com/article
//! TITLE: Article title
//! CRAWLED_AT: 2024-05-01 12:00:00
//!
//! Main text...
//! ```

use crate::config::Config;
use crate::state::{CorpusState, Outcome};
use crate::ScrapeError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Maximum length of the readable part of a file name
const MAX_SLUG_BYTES: usize = 120;

/// Writes documents to the corpus directory within a byte budget
#[derive(Debug)]
pub struct BudgetWriter {
    out_dir: PathBuf,
    truncate_to_budget: bool,
    corpus: CorpusState,
}

impl BudgetWriter {
    /// Creates the writer, creating `out_dir` if needed
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Write` if the directory cannot be created.
    pub fn new(
        out_dir: impl Into<PathBuf>,
        max_total_bytes: u64,
        truncate_to_budget: bool,
    ) -> Result<Self, ScrapeError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|source| ScrapeError::Write {
            path: out_dir.display().to_string(),
            source,
        })?;

        Ok(Self {
            out_dir,
            truncate_to_budget,
            corpus: CorpusState::new(max_total_bytes),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        Self::new(
            config.output.out_dir.clone(),
            config.scraper.max_total_bytes,
            config.output.truncate_to_budget,
        )
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn corpus(&self) -> &CorpusState {
        &self.corpus
    }

    pub fn is_exhausted(&self) -> bool {
        self.corpus.is_exhausted()
    }

    /// Writes a document to the corpus
    ///
    /// # Returns
    ///
    /// * `Outcome::Saved` - The file was written
    /// * `Outcome::Duplicate` - Identical text is already in the corpus
    /// * `Outcome::BudgetExhausted` - The budget leaves no room for this document
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Write` if the file cannot be written.
    pub fn write(
        &mut self,
        url: &Url,
        title: Option<&str>,
        text: &str,
    ) -> Result<Outcome, ScrapeError> {
        if self.corpus.is_exhausted() {
            return Ok(Outcome::BudgetExhausted);
        }

        let text = text.trim();
        let fingerprint = CorpusState::fingerprint(text);
        if self.corpus.is_duplicate(&fingerprint) {
            return Ok(Outcome::Duplicate);
        }

        let crawled_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let header = render_header(url, title, &crawled_at);

        let body = if self.truncate_to_budget {
            let remaining = usize::try_from(self.corpus.remaining()).unwrap_or(usize::MAX);
            // Header, at least one character, trailing newline
            let available = remaining.saturating_sub(header.len() + 1);
            let body = truncate_text(text, available);
            if body.is_empty() {
                tracing::debug!(
                    "{} bytes left, not enough for {}",
                    self.corpus.remaining(),
                    url
                );
                self.corpus.exhaust();
                return Ok(Outcome::BudgetExhausted);
            }
            if body.len() < text.len() {
                tracing::info!(
                    "Truncating {} from {} to {} bytes to fit the budget",
                    url,
                    text.len(),
                    body.len()
                );
            }
            body
        } else {
            text
        };

        let content = format!("{}{}\n", header, body);
        let path = self.out_dir.join(format!("{}.txt", slugify(url)));
        fs::write(&path, &content).map_err(|source| ScrapeError::Write {
            path: path.display().to_string(),
            source,
        })?;

        let bytes = content.len() as u64;
        let total = self.corpus.record_file(&path, bytes, fingerprint);
        Ok(Outcome::Saved { path, bytes, total })
    }
}

/// Renders the metadata header, including the blank separator line
pub fn render_header(url: &Url, title: Option<&str>, crawled_at: &str) -> String {
    let title_line = format!("TITLE: {}", title.unwrap_or("").trim());
    format!(
        "URL: {}\n{}\nCRAWLED_AT: {}\n\n",
        url,
        title_line.trim_end(),
        crawled_at
    )
}

/// Cuts `text` to at most `max_bytes` bytes
///
/// Cuts at a character boundary, backing up to the last whitespace when that
/// keeps some text. Trailing whitespace is removed.
pub fn truncate_text(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    let cut = &text[..end];
    let next_is_break = text[end..].starts_with(char::is_whitespace);
    if !next_is_break {
        if let Some(space) = cut.rfind(char::is_whitespace) {
            let word_cut = cut[..space].trim_end();
            if !word_cut.is_empty() {
                return word_cut;
            }
        }
    }
    cut.trim_end()
}

/// Derives a deterministic file name (without extension) from a URL
///
/// `host + path` with every run of characters outside `[A-Za-z0-9._-]`
/// replaced by `-`, capped in length, followed by the first 8 hex digits of
/// the SHA-256 of the full URL.
///
/// # Example
///
/// ```
/// use corpus_scraper::output::slugify;
/// use url::Url;
///
/// let url = Url::parse("https://en.wikipedia.org/wiki/Rust_(language)").unwrap();
/// let slug = slugify(&url);
/// assert!(slug.starts_with("en.wikipedia.org-wiki-Rust_-language-"));
/// ```
pub fn slugify(url: &Url) -> String {
    let raw = format!("{}{}", url.host_str().unwrap_or(""), url.path());

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    // Slug is ASCII, any byte index is a char boundary
    slug.truncate(MAX_SLUG_BYTES);
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "page" } else { slug };

    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
    format!("{}-{}", slug, &digest[..8])
}
