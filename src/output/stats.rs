//! Run statistics
//!
//! This module collects the totals of a scrape run and prints them to stdout
//! at exit.

use crate::state::OutcomeKind;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape run summary
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of URLs per outcome
    pub outcomes: BTreeMap<OutcomeKind, u64>,

    /// Bytes written to the corpus
    pub total_bytes: u64,

    /// Configured budget
    pub max_total_bytes: u64,

    /// Corpus files in write order
    pub files: Vec<PathBuf>,

    /// Origins whose robots.txt was consulted
    pub robots_origins: usize,

    /// HTTP requests sent (robots, API and pages)
    pub requests: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of URLs attempted
    pub fn urls_attempted(&self) -> u64 {
        self.outcomes.values().sum()
    }

    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.outcomes.get(&kind).copied().unwrap_or(0)
    }

    /// Number of URLs that failed rather than being skipped by policy
    pub fn errors(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(kind, _)| kind.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Compact form used as the closing status log line
    pub fn one_line(&self) -> String {
        let mut line = format!(
            "files={} total_bytes={} budget={}",
            self.files.len(),
            self.total_bytes,
            self.max_total_bytes
        );
        for (kind, count) in &self.outcomes {
            line.push_str(&format!(" {}={}", kind.label(), count));
        }
        line
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  URLs attempted: {}", summary.urls_attempted());
    println!("  Files written: {}", summary.files.len());
    let used = if summary.max_total_bytes > 0 {
        (summary.total_bytes as f64 / summary.max_total_bytes as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  Bytes written: {} / {} ({:.1}% of budget)",
        summary.total_bytes, summary.max_total_bytes, used
    );
    println!("  HTTP requests: {}", summary.requests);
    println!("  robots.txt origins: {}", summary.robots_origins);
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    if !summary.outcomes.is_empty() {
        println!("Outcomes:");
        for kind in OutcomeKind::all() {
            let count = summary.count(kind);
            if count > 0 {
                println!("  {}: {}", kind.label(), count);
            }
        }
        println!();
    }

    let errors = summary.errors();
    if errors > 0 {
        println!("Errors: {} (see the status log for details)", errors);
    }
}
