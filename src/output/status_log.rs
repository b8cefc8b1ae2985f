//! Append-only status log
//!
//! One line per attempted URL:
//!
//! ```text
//! 2024-05-01 12:00:00 SAVED https://example.com/a -> corpus/example.com-a-1a2b3c4d.txt +1834 bytes, total=1834
//! 2024-05-01 12:00:03 ROBOTS-BLOCKED https://example.com/private
//! ```
//!
//! The last line of a run is a summary of the outcome counts.

use crate::output::stats::RunSummary;
use crate::state::{Outcome, OutcomeKind};
use crate::ScrapeError;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use url::Url;

/// Status log file plus per-outcome counters
#[derive(Debug)]
pub struct StatusLog {
    path: PathBuf,
    file: File,
    counts: BTreeMap<OutcomeKind, u64>,
}

impl StatusLog {
    /// Opens `path` for appending, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Write` if the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let path = path.into();
        let write_error = |source| ScrapeError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_error)?;

        Ok(Self {
            path,
            file,
            counts: BTreeMap::new(),
        })
    }

    /// Records the outcome for a URL
    pub fn record(&mut self, url: &Url, outcome: &Outcome) -> Result<(), ScrapeError> {
        let kind = outcome.kind();
        *self.counts.entry(kind).or_default() += 1;

        match kind {
            OutcomeKind::Saved => tracing::info!("{} {}", url, outcome),
            OutcomeKind::HttpStatus | OutcomeKind::NetworkError => {
                tracing::warn!("{} {}", url, outcome)
            }
            _ => tracing::debug!("{} {}", url, outcome),
        }

        let detail = outcome.detail();
        let line = if detail.is_empty() {
            format!("{} {}", kind.label(), url)
        } else {
            format!("{} {} {}", kind.label(), url, detail)
        };
        self.write_line(&line)
    }

    /// Number of URLs recorded with the given outcome
    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Outcome counts in label order
    pub fn counts(&self) -> &BTreeMap<OutcomeKind, u64> {
        &self.counts
    }

    /// Writes the closing summary line
    pub fn finish(&mut self, summary: &RunSummary) -> Result<(), ScrapeError> {
        let line = format!("SUMMARY {}", summary.one_line());
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<(), ScrapeError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.file, "{} {}", timestamp, line).map_err(|source| ScrapeError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}
