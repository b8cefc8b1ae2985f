//! Output module for the corpus and the run records
//!
//! This module handles:
//! - Writing corpus files within the byte budget
//! - Appending per-URL outcomes to the status log
//! - Summarising the run

pub mod stats;
mod status_log;
mod writer;

pub use stats::{print_summary, RunSummary};
pub use status_log::StatusLog;
pub use writer::{render_header, slugify, truncate_text, BudgetWriter};
