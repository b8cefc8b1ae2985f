//! corpus-scraper main entry point
//!
//! This is the command-line interface for the polite plain-text corpus
//! builder.

use anyhow::Context;
use clap::Parser;
use corpus_scraper::config::{apply_env_overrides, load_config_with_hash, validate, Config};
use corpus_scraper::crawler::run_scrape;
use corpus_scraper::output::print_summary;
use corpus_scraper::seeds::load_seeds;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// corpus-scraper: a polite scraper for small plain-text corpora
///
/// Fetches the pages listed in a seeds file while respecting robots.txt and
/// a fixed delay between requests, extracts their main text and writes one
/// `.txt` file per page until the byte budget is reached.
#[derive(Parser, Debug)]
#[command(name = "corpus-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Polite scraper for a small plain-text corpus", long_about = None)]
struct Cli {
    /// File with seed URLs, one per line
    #[arg(long, value_name = "PATH")]
    seeds: PathBuf,

    /// Directory to save .txt files into
    #[arg(long, value_name = "DIR")]
    out: PathBuf,

    /// Corpus size budget in bytes [default: 1200000]
    #[arg(long, value_name = "BYTES")]
    max_total_bytes: Option<u64>,

    /// Minimum delay between requests in seconds [default: 2.0]
    #[arg(long, value_name = "SECONDS")]
    delay_seconds: Option<f64>,

    /// Upper bound of the random extra delay in seconds [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    jitter_seconds: Option<f64>,

    /// HTTP timeout in seconds [default: 20]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Follow a few links from every seed page
    #[arg(long)]
    crawl: bool,

    /// Maximum number of links followed per seed with --crawl [default: 5]
    #[arg(long, value_name = "N")]
    max_follow: Option<usize>,

    /// When crawling, stay on the seed's host
    #[arg(long)]
    same_domain: bool,

    /// Custom User-Agent header
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Status log path [default: logs/scrape.log]
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line flags on top of the file and environment layers
    fn apply_to(&self, config: &mut Config) {
        config.output.out_dir = self.out.clone();

        if let Some(max_total_bytes) = self.max_total_bytes {
            config.scraper.max_total_bytes = max_total_bytes;
        }
        if let Some(delay) = self.delay_seconds {
            config.scraper.delay_seconds = delay;
        }
        if let Some(jitter) = self.jitter_seconds {
            config.scraper.jitter_seconds = jitter;
        }
        if let Some(timeout) = self.timeout {
            config.scraper.timeout_seconds = timeout;
        }
        if self.crawl {
            config.crawl.enabled = true;
        }
        if let Some(max_follow) = self.max_follow {
            config.crawl.max_follow = max_follow;
        }
        if self.same_domain {
            config.crawl.same_domain = true;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent.user_agent = user_agent.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.output.log_path = log_file.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if dotenvy::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }

    let config = build_config(&cli)?;

    let seeds = load_seeds(&cli.seeds)
        .with_context(|| format!("Cannot load seeds from {}", cli.seeds.display()))?;
    if seeds.is_empty() {
        tracing::warn!("No valid seed URLs in {}", cli.seeds.display());
    }

    let log_path = config.output.log_path.clone();
    match run_scrape(config, &seeds).await {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
                println!("\nStatus log: {}", log_path.display());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_scraper=info,warn"),
            1 => EnvFilter::new("corpus_scraper=debug,info"),
            2 => EnvFilter::new("corpus_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the configuration: defaults, then TOML file, then environment, then flags
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config)?;
    cli.apply_to(&mut config);
    validate(&config)?;

    Ok(config)
}
