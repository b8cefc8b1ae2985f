use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Running state of the corpus being built
///
/// The state only grows: files are appended and the byte total increases
/// until it reaches the budget, after which the corpus is terminal.
#[derive(Debug, Clone)]
pub struct CorpusState {
    /// Budget in bytes
    max_total_bytes: u64,

    /// Sum of the sizes of all written files
    total_bytes: u64,

    /// Written files, in write order
    files: Vec<PathBuf>,

    /// SHA-256 fingerprints of the text of every written document
    fingerprints: HashSet<String>,

    /// Set when no further document fits, even below the budget
    closed: bool,
}

impl CorpusState {
    pub fn new(max_total_bytes: u64) -> Self {
        Self {
            max_total_bytes,
            total_bytes: 0,
            files: Vec::new(),
            fingerprints: HashSet::new(),
            closed: false,
        }
    }

    /// Computes the fingerprint used for duplicate detection
    ///
    /// Surrounding whitespace does not change the fingerprint.
    pub fn fingerprint(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.trim().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn max_total_bytes(&self) -> u64 {
        self.max_total_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Bytes left before the budget is reached
    pub fn remaining(&self) -> u64 {
        if self.closed {
            return 0;
        }
        self.max_total_bytes.saturating_sub(self.total_bytes)
    }

    /// Returns true once the total has reached the budget or the corpus was closed
    pub fn is_exhausted(&self) -> bool {
        self.closed || self.total_bytes >= self.max_total_bytes
    }

    /// Marks the budget as spent without writing anything
    ///
    /// Used when the remaining budget is too small to hold another document.
    pub fn exhaust(&mut self) {
        if !self.is_exhausted() {
            tracing::debug!(
                "Closing corpus with {} of {} bytes used",
                self.total_bytes,
                self.max_total_bytes
            );
            self.closed = true;
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_duplicate(&self, fingerprint: &str) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    /// Records a written file and returns the new total
    pub fn record_file(&mut self, path: &Path, bytes: u64, fingerprint: String) -> u64 {
        self.files.push(path.to_path_buf());
        self.fingerprints.insert(fingerprint);
        self.total_bytes += bytes;
        self.total_bytes
    }
}
