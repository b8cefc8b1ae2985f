//! Scrape coordinator - main run orchestration logic
//!
//! This module contains the sequential run loop that ties all components
//! together:
//! - Visiting seeds in file order
//! - Gating every page on robots.txt
//! - Choosing the Wikipedia fast-path or the HTML path
//! - Extracting, de-duplicating and writing text within the budget
//! - Following a few links per seed in crawl mode (one hop only)
//! - Recording every outcome in the status log

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::discover_links;
use crate::crawler::wikipedia::{fetch_wikipedia_plain, wiki_title};
use crate::extract::extract_main_text;
use crate::output::{BudgetWriter, RunSummary, StatusLog};
use crate::robots::RobotsChecker;
use crate::state::{Outcome, VisitedSet};
use crate::url::normalize_url;
use crate::ScrapeError;
use std::time::{Duration, Instant};
use url::Url;

/// An HTML page fetched on the generic path
///
/// Kept so the seed's links can be discovered without a second request.
#[derive(Debug)]
struct FetchedPage {
    /// URL after redirects
    url: Url,
    html: String,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    robots: RobotsChecker,
    writer: BudgetWriter,
    status: StatusLog,
    visited: VisitedSet,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Creates the output directory and opens the status log.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - The HTTP client, output directory or status log
    ///   could not be set up
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config)?;
        let robots = RobotsChecker::from_config(&config);
        let writer = BudgetWriter::from_config(&config)?;
        let status = StatusLog::open(config.output.log_path.clone())?;

        Ok(Self {
            config,
            fetcher,
            robots,
            writer,
            status,
            visited: VisitedSet::new(),
        })
    }

    /// Runs the scrape over the given seeds
    ///
    /// Stops early once the byte budget is reached. Per-URL failures are
    /// recorded and skipped; only I/O errors on the corpus or the status log
    /// abort the run.
    pub async fn run(&mut self, seeds: &[Url]) -> Result<RunSummary, ScrapeError> {
        tracing::info!(
            "Starting scrape: {} seeds, budget {} bytes, output {}",
            seeds.len(),
            self.config.scraper.max_total_bytes,
            self.writer.out_dir().display()
        );
        let start_time = Instant::now();

        for seed in seeds {
            if self.writer.is_exhausted() {
                tracing::info!("Byte budget reached, stopping");
                break;
            }

            if self.visited.contains(seed) {
                tracing::debug!("Skipping repeated seed {}", seed);
                continue;
            }

            let page = self.process_url(seed).await?;

            if self.config.crawl.enabled && !self.writer.is_exhausted() {
                self.follow_links(seed, page).await?;
            }
        }

        let summary = self.summary(start_time.elapsed());
        self.status.finish(&summary)?;

        tracing::info!(
            "Scrape completed: {} files, {} bytes in {:?}",
            summary.files.len(),
            summary.total_bytes,
            summary.elapsed
        );

        Ok(summary)
    }

    /// Processes a single URL and records its outcome
    ///
    /// This method:
    /// 1. Skips URLs already visited
    /// 2. Checks the budget
    /// 3. Checks robots.txt
    /// 4. Tries the Wikipedia fast-path
    /// 5. Otherwise fetches the page and extracts its main text
    /// 6. Writes the text to the corpus
    ///
    /// Returns the fetched HTML when the page went through the HTML path.
    async fn process_url(&mut self, url: &Url) -> Result<Option<FetchedPage>, ScrapeError> {
        if !self.visited.insert(url) {
            tracing::debug!("Already visited {}", url);
            return Ok(None);
        }

        if self.writer.is_exhausted() {
            self.status.record(url, &Outcome::BudgetExhausted)?;
            return Ok(None);
        }

        if !self.robots.is_allowed(&mut self.fetcher, url).await {
            self.status.record(url, &Outcome::RobotsBlocked)?;
            return Ok(None);
        }
        let crawl_delay = self.robots.crawl_delay(url);

        if self.config.wikipedia.enabled {
            if let Some(title) = wiki_title(url, &self.config.wikipedia.domains) {
                if let Some(doc) =
                    fetch_wikipedia_plain(&mut self.fetcher, url, &title, crawl_delay).await
                {
                    let outcome = self.writer.write(url, Some(&doc.title), &doc.text)?;
                    self.status.record(url, &outcome)?;
                    return Ok(None);
                }
                tracing::debug!("Wiki API gave no text for {}, using the HTML page", url);
            }
        }

        let (outcome, page) = match self.fetcher.fetch_page(url, crawl_delay).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if let Ok(normalized) = normalize_url(final_url.as_str()) {
                    self.visited.insert(&normalized);
                }

                let outcome = match extract_main_text(&body, self.config.extract.min_text_chars) {
                    Some(extracted) => {
                        self.writer
                            .write(url, extracted.title.as_deref(), &extracted.text)?
                    }
                    None => Outcome::ExtractionFailed,
                };
                let page = FetchedPage {
                    url: final_url,
                    html: body,
                };
                (outcome, Some(page))
            }
            FetchResult::ContentMismatch { content_type } => {
                (Outcome::ContentMismatch { content_type }, None)
            }
            FetchResult::HttpError { status_code } => (Outcome::HttpStatus { status_code }, None),
            FetchResult::NetworkError { error } => (Outcome::NetworkError { error }, None),
        };

        self.status.record(url, &outcome)?;
        Ok(page)
    }

    /// Follows up to `max-follow` links found on a seed page
    ///
    /// Followed pages are processed like seeds but never expanded further.
    async fn follow_links(
        &mut self,
        seed: &Url,
        page: Option<FetchedPage>,
    ) -> Result<(), ScrapeError> {
        let page = match page {
            Some(page) => page,
            None => match self.fetch_for_links(seed).await {
                Some(page) => page,
                None => return Ok(()),
            },
        };

        let links = discover_links(
            &page.html,
            &page.url,
            self.config.crawl.max_follow,
            self.config.crawl.same_domain.then_some(seed),
            &self.visited,
        );
        tracing::info!("Following {} links from {}", links.len(), seed);

        for link in &links {
            if self.writer.is_exhausted() {
                break;
            }
            self.process_url(link).await?;
        }

        Ok(())
    }

    /// Fetches a seed's HTML only for link discovery
    async fn fetch_for_links(&mut self, seed: &Url) -> Option<FetchedPage> {
        if !self.robots.is_allowed(&mut self.fetcher, seed).await {
            return None;
        }

        let crawl_delay = self.robots.crawl_delay(seed);
        match self.fetcher.fetch_page(seed, crawl_delay).await {
            FetchResult::Success {
                final_url, body, ..
            } => Some(FetchedPage {
                url: final_url,
                html: body,
            }),
            other => {
                tracing::debug!("No links from {}: {:?}", seed, other);
                None
            }
        }
    }

    fn summary(&self, elapsed: Duration) -> RunSummary {
        let corpus = self.writer.corpus();
        RunSummary {
            outcomes: self.status.counts().clone(),
            total_bytes: corpus.total_bytes(),
            max_total_bytes: corpus.max_total_bytes(),
            files: corpus.files().to_vec(),
            robots_origins: self.robots.origins_checked(),
            requests: self.fetcher.throttle().request_count(),
            elapsed,
        }
    }
}

/// Runs a complete scrape
///
/// # Example
///
/// ```no_run
/// use corpus_scraper::config::Config;
/// use corpus_scraper::crawler::run_scrape;
/// use corpus_scraper::seeds::load_seeds;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = load_seeds(Path::new("seeds.txt"))?;
/// let summary = run_scrape(Config::default(), &seeds).await?;
/// println!("{} files written", summary.files.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, seeds: &[Url]) -> Result<RunSummary, ScrapeError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(seeds).await
}
