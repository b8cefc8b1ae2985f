//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `Outcome`: What happened to a single URL (saved, blocked, failed, ...)
//! - `CorpusState`: Running byte total, written files and content fingerprints
//! - `VisitedSet`: URLs already attempted during this run

mod corpus;
mod outcome;
mod visited;

// Re-export main types
pub use corpus::CorpusState;
pub use outcome::{Outcome, OutcomeKind};
pub use visited::VisitedSet;
