//! URL handling module
//!
//! This module provides URL normalization for the visited set, host
//! extraction and host-pattern matching.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use matcher::{host_matches, matches_any};
pub use normalize::normalize_url;
