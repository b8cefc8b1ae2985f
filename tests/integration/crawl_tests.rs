//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! pipeline end-to-end: robots.txt, fetching, extraction, budgeted writing
//! and the status log.

use corpus_scraper::config::Config;
use corpus_scraper::crawler::{run_scrape, Coordinator};
use corpus_scraper::state::OutcomeKind;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILLER: &str = "Information retrieval is the task of identifying and retrieving \
    information system resources that are relevant to an information need. The need \
    can be specified in the form of a search query. ";

/// Creates a test configuration writing into `dir`
///
/// The mock server's host is treated as a wiki host so the API fast-path can
/// be exercised locally.
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.scraper.delay_seconds = 0.0;
    config.scraper.jitter_seconds = 0.0;
    config.scraper.timeout_seconds = 5;
    config.wikipedia.domains = vec!["127.0.0.1".to_string()];
    config.output.out_dir = dir.path().join("corpus");
    config.output.log_path = dir.path().join("logs").join("scrape.log");
    config
}

/// HTML page whose main article is `paragraphs` copies of filler text
fn article_page(title: &str, tag: &str, paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| format!("<p>{} paragraph {}. {}</p>", tag, i, FILLER))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>\
         <nav><a href=\"/\">Home</a></nav><article>{}</article>\
         <footer>Footer text</footer></body></html>",
        title, body
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn url(server: &MockServer, page: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), page)).unwrap()
}

/// Labels of the per-URL lines in the status log
fn log_labels(config: &Config) -> Vec<String> {
    fs::read_to_string(&config.output.log_path)
        .unwrap()
        .lines()
        .filter_map(|line| line.split_whitespace().nth(2).map(str::to_string))
        .filter(|label| label != "SUMMARY")
        .collect()
}

fn corpus_files(config: &Config) -> Vec<std::path::PathBuf> {
    fs::read_dir(&config.output.out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[tokio::test]
async fn test_wikipedia_seed_small_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "batchcomplete": true,
            "query": {"pages": [{
                "pageid": 15271,
                "title": "Information retrieval",
                "extract": FILLER.repeat(30)
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The article HTML is never needed
    Mock::given(method("GET"))
        .and(path("/wiki/Information_retrieval"))
        .respond_with(html(article_page("IR", "html", 5)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.scraper.max_total_bytes = 1000;

    let seed = url(&server, "/wiki/Information_retrieval");
    let summary = run_scrape(config.clone(), &[seed]).await.unwrap();

    let files = corpus_files(&config);
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.len() <= 1000);
    assert!(content.contains("\nTITLE: Information retrieval\n"));
    assert!(content.contains("Information retrieval is the task"));

    assert_eq!(summary.total_bytes, content.len() as u64);
    assert_eq!(log_labels(&config), vec!["SAVED"]);
}

#[tokio::test]
async fn test_wikipedia_api_down_falls_back_to_html() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Rust"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/wiki/Rust", article_page("Rust - Wiki", "rust", 3)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let summary = run_scrape(config.clone(), &[url(&server, "/wiki/Rust")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::Saved), 1);
    let content = fs::read_to_string(&summary.files[0]).unwrap();
    assert!(content.contains("\nTITLE: Rust - Wiki\n"));
    assert!(content.contains("rust paragraph 0."));
    assert!(!content.contains("Footer text"));
}

#[tokio::test]
async fn test_robots_disallowed_url_never_fetched() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    Mock::given(method("GET"))
        .and(path("/private/report"))
        .respond_with(html(article_page("Secret", "secret", 3)))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/public", article_page("Public", "public", 3)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seeds = vec![url(&server, "/private/report"), url(&server, "/public")];

    let summary = run_scrape(config.clone(), &seeds).await.unwrap();

    assert_eq!(summary.count(OutcomeKind::RobotsBlocked), 1);
    assert_eq!(summary.count(OutcomeKind::Saved), 1);
    assert_eq!(summary.robots_origins, 1);
    assert_eq!(log_labels(&config), vec!["ROBOTS-BLOCKED", "SAVED"]);
}

#[tokio::test]
async fn test_robots_group_for_our_agent() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: RAG-Course-Scraper\nDisallow: /\n\nUser-agent: *\nAllow: /",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(article_page("Page", "page", 3)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_scrape(create_test_config(&dir), &[url(&server, "/page")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::RobotsBlocked), 1);
    assert!(summary.files.is_empty());
}

#[tokio::test]
async fn test_skip_outcomes_are_logged() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/short",
        "<html><body><article><p>Too short.</p></article></body></html>".to_string(),
    )
    .await;
    mount_page(&server, "/original", article_page("Original", "same", 3)).await;
    mount_page(&server, "/mirror", article_page("Mirror", "same", 3)).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seeds: Vec<Url> = ["/paper.pdf", "/short", "/original", "/mirror", "/gone"]
        .iter()
        .map(|p| url(&server, p))
        .collect();

    let summary = run_scrape(config.clone(), &seeds).await.unwrap();

    assert_eq!(
        log_labels(&config),
        vec![
            "SKIP-NONHTML",
            "EXTRACTION-FAILED",
            "SAVED",
            "DUPLICATE",
            "HTTP-ERROR"
        ]
    );
    assert_eq!(summary.files.len(), 1);
    assert_eq!(corpus_files(&config).len(), 1);
    assert_eq!(summary.errors(), 2);

    let log = fs::read_to_string(&config.output.log_path).unwrap();
    assert!(log.contains("(application/pdf)"));
    assert!(log.contains("HTTP 410"));
    assert!(log.lines().last().unwrap().contains("SUMMARY files=1"));
}

#[tokio::test]
async fn test_budget_halts_run() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    for page in ["/a", "/b", "/c"] {
        mount_page(&server, page, article_page(page, page, 3)).await;
    }
    Mock::given(method("GET"))
        .and(path("/d"))
        .respond_with(html(article_page("d", "d", 3)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.scraper.max_total_bytes = 1500;
    let seeds: Vec<Url> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|p| url(&server, p))
        .collect();

    let summary = run_scrape(config.clone(), &seeds).await.unwrap();

    assert!(summary.total_bytes <= 1500);
    assert_eq!(summary.files.len(), 2);
    let on_disk: u64 = corpus_files(&config)
        .iter()
        .map(|p| fs::metadata(p).unwrap().len())
        .sum();
    assert_eq!(on_disk, summary.total_bytes);
}

#[tokio::test]
async fn test_budget_without_truncation_overshoots_by_one_file() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/a", article_page("a", "a", 6)).await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(article_page("b", "b", 6)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.scraper.max_total_bytes = 500;
    config.output.truncate_to_budget = false;

    let summary = run_scrape(config.clone(), &[url(&server, "/a"), url(&server, "/b")])
        .await
        .unwrap();

    assert_eq!(summary.files.len(), 1);
    assert!(summary.total_bytes > 500);
}

#[tokio::test]
async fn test_crawl_respects_max_follow_and_same_domain() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    let mut links: String = (0..10)
        .map(|i| format!("<a href=\"/p{}\">Page {}</a>", i, i))
        .collect();
    links.push_str("<a href=\"https://elsewhere.invalid/x\">Elsewhere</a>");
    let seed_html = format!(
        "<html><head><title>Index</title></head><body><nav>{}</nav>\
         <article><p>index paragraph. {}</p><p>{}</p></article></body></html>",
        links, FILLER, FILLER
    );
    mount_page(&server, "/", seed_html).await;
    for i in 0..10 {
        let page = format!("/p{}", i);
        mount_page(&server, &page, article_page(&page, &page, 3)).await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawl.enabled = true;
    config.crawl.max_follow = 3;
    config.crawl.same_domain = true;

    let summary = run_scrape(config.clone(), &[url(&server, "/")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::Saved), 4);

    let requests = server.received_requests().await.unwrap();
    let followed = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/p"))
        .count();
    assert_eq!(followed, 3);
    // The seed page is fetched once and reused for link discovery
    assert_eq!(requests.iter().filter(|r| r.url.path() == "/").count(), 1);
}

#[tokio::test]
async fn test_crawl_does_not_recurse() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(
        &server,
        "/",
        format!(
            "<html><body><article><p>root. {}</p><p>{}</p><a href=\"/child\">c</a></article></body></html>",
            FILLER, FILLER
        ),
    )
    .await;
    mount_page(
        &server,
        "/child",
        format!(
            "<html><body><article><p>child. {}</p><p>{}</p><a href=\"/grandchild\">g</a></article></body></html>",
            FILLER, FILLER
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/grandchild"))
        .respond_with(html(article_page("g", "g", 3)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawl.enabled = true;

    let summary = run_scrape(config, &[url(&server, "/")]).await.unwrap();

    assert_eq!(summary.count(OutcomeKind::Saved), 2);
}

#[tokio::test]
async fn test_requests_are_spaced_by_delay() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/a", article_page("a", "a", 3)).await;
    mount_page(&server, "/b", article_page("b", "b", 3)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.scraper.delay_seconds = 0.3;

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator
        .run(&[url(&server, "/a"), url(&server, "/b")])
        .await
        .unwrap();

    // robots.txt, /a, /b: two gaps of at least the delay
    assert_eq!(summary.requests, 3);
    assert!(summary.elapsed >= Duration::from_millis(600));
}

async fn mount_wiki_api(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "batchcomplete": true,
            "query": {"pages": [{
                "pageid": 1,
                "title": title,
                "extract": FILLER.repeat(5)
            }]}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_from_wiki_seed_fetches_html_for_links() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_wiki_api(&server, "Rust").await;
    Mock::given(method("GET"))
        .and(path("/wiki/Rust"))
        .respond_with(html(format!(
            "<html><body><article><p>rust. {}</p>\
             <a href=\"/wiki/Rust\">self</a>\
             <a href=\"/docs/a\">a</a><a href=\"/docs/b\">b</a></article></body></html>",
            FILLER
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/a", article_page("A", "doc-a", 3)).await;
    mount_page(&server, "/docs/b", article_page("B", "doc-b", 3)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawl.enabled = true;

    let summary = run_scrape(config.clone(), &[url(&server, "/wiki/Rust")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::Saved), 3);
    let labels = log_labels(&config);
    assert_eq!(labels, vec!["SAVED", "SAVED", "SAVED"]);

    let requests = server.received_requests().await.unwrap();
    for page in ["/docs/a", "/docs/b"] {
        assert_eq!(requests.iter().filter(|r| r.url.path() == page).count(), 1);
    }
}

#[tokio::test]
async fn test_crawl_skips_link_discovery_for_blocked_seed() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /wiki/Blocked").await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Blocked"))
        .respond_with(html(article_page("Blocked", "blocked", 3)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawl.enabled = true;

    let summary = run_scrape(config.clone(), &[url(&server, "/wiki/Blocked")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::RobotsBlocked), 1);
    assert!(summary.files.is_empty());
    // Only robots.txt was requested
    assert_eq!(summary.requests, 1);
}

#[tokio::test]
async fn test_huge_crawl_delay_is_clamped() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: *\nCrawl-delay: 99999999999999999999\nAllow: /",
    )
    .await;
    mount_page(&server, "/a", article_page("a", "a", 3)).await;
    mount_page(&server, "/b", article_page("b", "b", 3)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.robots.max_crawl_delay_seconds = 0.2;

    let summary = run_scrape(config, &[url(&server, "/a"), url(&server, "/b")])
        .await
        .unwrap();

    assert_eq!(summary.count(OutcomeKind::Saved), 2);
    // robots.txt, then /a and /b each spaced by the clamped delay
    assert!(summary.elapsed >= Duration::from_millis(400));
    assert!(summary.elapsed < Duration::from_secs(30));
}
