//! Configuration module for the scraper
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SCRAPER_*` environment variables, then command-line flags (applied by the
//! binary). The result is validated once all layers are applied.
//!
//! # Example
//!
//! ```no_run
//! use corpus_scraper::config::{apply_env_overrides, load_config, validate};
//! use std::path::Path;
//!
//! let mut config = load_config(Path::new("scraper.toml")).unwrap();
//! apply_env_overrides(&mut config).unwrap();
//! validate(&config).unwrap();
//! println!("Budget: {} bytes", config.scraper.max_total_bytes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, ExtractConfig, OutputConfig, RobotsConfig, RobotsFailurePolicy,
    ScraperConfig, UserAgentConfig, WikipediaConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, apply_overrides_from, compute_config_hash, load_config,
    load_config_with_hash,
};

pub use validation::validate;
