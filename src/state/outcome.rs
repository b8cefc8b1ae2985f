/// Per-URL outcome definitions
///
/// Every URL the pipeline attempts ends in exactly one outcome, which is
/// written to the status log.
use std::fmt;
use std::path::PathBuf;

/// Result of processing a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    // ===== Success =====
    /// Text was written to the corpus
    Saved {
        /// File that received the text
        path: PathBuf,
        /// Bytes added by this file
        bytes: u64,
        /// Corpus total after this file
        total: u64,
    },

    // ===== Skips =====
    /// robots.txt disallows the URL for our user agent
    RobotsBlocked,

    /// The response was not HTML
    ContentMismatch {
        /// The Content-Type header received
        content_type: String,
    },

    /// The text is identical to a document already in the corpus
    Duplicate,

    /// The corpus budget was reached before this URL could be written
    BudgetExhausted,

    // ===== Errors =====
    /// Non-2xx response
    HttpStatus {
        /// The HTTP status code
        status_code: u16,
    },

    /// Connection failure, timeout or unreadable body
    NetworkError {
        /// Error description
        error: String,
    },

    /// No main-content block, or the block was too short
    ExtractionFailed,
}

/// Field-less discriminant of [`Outcome`], used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    Saved,
    RobotsBlocked,
    ContentMismatch,
    Duplicate,
    BudgetExhausted,
    HttpStatus,
    NetworkError,
    ExtractionFailed,
}

impl Outcome {
    /// Returns the discriminant of this outcome
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Saved { .. } => OutcomeKind::Saved,
            Self::RobotsBlocked => OutcomeKind::RobotsBlocked,
            Self::ContentMismatch { .. } => OutcomeKind::ContentMismatch,
            Self::Duplicate => OutcomeKind::Duplicate,
            Self::BudgetExhausted => OutcomeKind::BudgetExhausted,
            Self::HttpStatus { .. } => OutcomeKind::HttpStatus,
            Self::NetworkError { .. } => OutcomeKind::NetworkError,
            Self::ExtractionFailed => OutcomeKind::ExtractionFailed,
        }
    }

    /// Returns true if text was written to the corpus
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// Returns a human-readable detail for the status log
    pub fn detail(&self) -> String {
        match self {
            Self::Saved { path, bytes, total } => {
                format!("-> {} +{} bytes, total={}", path.display(), bytes, total)
            }
            Self::ContentMismatch { content_type } => format!("({})", content_type),
            Self::HttpStatus { status_code } => format!("HTTP {}", status_code),
            Self::NetworkError { error } => error.clone(),
            Self::RobotsBlocked
            | Self::Duplicate
            | Self::BudgetExhausted
            | Self::ExtractionFailed => String::new(),
        }
    }
}

impl OutcomeKind {
    /// Label written to the status log
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saved => "SAVED",
            Self::RobotsBlocked => "ROBOTS-BLOCKED",
            Self::ContentMismatch => "SKIP-NONHTML",
            Self::Duplicate => "DUPLICATE",
            Self::BudgetExhausted => "BUDGET-EXHAUSTED",
            Self::HttpStatus => "HTTP-ERROR",
            Self::NetworkError => "FETCH-ERROR",
            Self::ExtractionFailed => "EXTRACTION-FAILED",
        }
    }

    /// Returns true for outcomes caused by a failure rather than a policy skip
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus | Self::NetworkError | Self::ExtractionFailed
        )
    }

    /// Returns all outcome kinds in display order
    pub fn all() -> [Self; 8] {
        [
            Self::Saved,
            Self::RobotsBlocked,
            Self::ContentMismatch,
            Self::Duplicate,
            Self::BudgetExhausted,
            Self::HttpStatus,
            Self::NetworkError,
            Self::ExtractionFailed,
        ]
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        if detail.is_empty() {
            write!(f, "{}", self.kind())
        } else {
            write!(f, "{} {}", self.kind(), detail)
        }
    }
}
