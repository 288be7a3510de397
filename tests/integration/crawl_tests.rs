//! Integration tests for the crawler
//!
//! Most tests drive seed crawls against an in-memory site; the HTTP tests use
//! wiremock to exercise `HttpFetcher` and the full crawl cycle end-to-end.

use async_trait::async_trait;
use origin_sweep::config::{ClassifyConfig, FetchConfig, OutputMode, SentinelMatch};
use origin_sweep::crawler::{
    BatchOrchestrator, CrawlSettings, FetchResult, Fetcher, HttpFetcher, Link, SeedCrawl,
};
use origin_sweep::output::ResultWriter;
use origin_sweep::url::{in_scope, Classifier, Normalizer, SentinelFilter};
use origin_sweep::UrlState;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory site: URL -> (body, links); unknown URLs fail
#[derive(Default)]
struct SiteFetcher {
    pages: HashMap<String, (String, Vec<String>)>,
    requests: Mutex<Vec<String>>,
}

impl SiteFetcher {
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            (
                "<html><body>ok</body></html>".to_string(),
                links.iter().map(|l| l.to_string()).collect(),
            ),
        );
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for SiteFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some((body, links)) => {
                FetchResult::success(body.clone(), links.iter().map(Link::new).collect())
            }
            None => FetchResult::failure("HTTP 404"),
        }
    }
}

/// Sends normalized `https` URLs to a plain-http mock server
struct PlainHttp(HttpFetcher);

#[async_trait]
impl Fetcher for PlainHttp {
    async fn fetch(&self, url: &str) -> FetchResult {
        let url = url.replacen("https://", "http://", 1);
        self.0.fetch(&url).await
    }
}

fn create_test_settings(split_documents: bool, depth_cap: Option<u32>) -> Arc<CrawlSettings> {
    Arc::new(CrawlSettings {
        classifier: Classifier::new(&ClassifyConfig {
            split_documents,
            ..ClassifyConfig::default()
        })
        .unwrap(),
        depth_cap,
        ..CrawlSettings::default()
    })
}

fn create_fetch_config(respect_robots: bool) -> FetchConfig {
    FetchConfig {
        crawler_name: "TestSweep".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
        timeout_secs: 5,
        respect_robots,
    }
}

/// A small site with a cycle, an off-site link, a sentinel link and a document
fn create_test_site() -> SiteFetcher {
    SiteFetcher::default()
        .page(
            "https://example.edu/",
            &[
                "https://www.example.edu/about",
                "http://example.edu/news/",
                "https://other.org/elsewhere",
                "https://example.edu/news/#page",
                "https://example.edu/files/catalog.pdf",
                "https://example.edu/logo.png",
            ],
        )
        .page(
            "https://example.edu/about",
            &["https://example.edu/", "https://dept.example.edu/"],
        )
        .page(
            "https://example.edu/news/",
            &["https://example.edu/news/2024", "https://example.edu/about"],
        )
        .page("https://example.edu/news/2024", &["https://example.edu/news/2024/a"])
        .page("https://dept.example.edu/", &[])
}

/// Two sections of one site that both link to the same page
fn create_overlapping_site() -> SiteFetcher {
    SiteFetcher::default()
        .page(
            "https://example.edu/left/",
            &["https://example.edu/left/1", "https://example.edu/shared"],
        )
        .page("https://example.edu/left/1", &[])
        .page(
            "https://example.edu/right/",
            &["https://example.edu/right/1", "https://example.edu/shared"],
        )
        .page("https://example.edu/right/1", &[])
        .page("https://example.edu/shared", &[])
}

/// Steps a crawl until its frontier is empty, keeping it for inspection
async fn drive(mut crawl: SeedCrawl, fetcher: &SiteFetcher) -> SeedCrawl {
    while crawl.step(fetcher).await {}
    crawl
}

#[tokio::test]
async fn test_full_crawl_in_memory_site() {
    let fetcher = create_test_site();
    let result = SeedCrawl::new("http://www.example.edu/", create_test_settings(true, None))
        .run(&fetcher)
        .await;

    let urls: Vec<&str> = result.urls().map(|u| u.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.edu/",
            "https://example.edu/files/catalog.pdf",
            "https://example.edu/about",
            "https://example.edu/news/",
            "https://dept.example.edu/",
            "https://example.edu/news/2024",
        ]
    );

    // news/2024/a is linked but does not exist
    assert_eq!(result.counters.failed, 1);
    assert_eq!(result.counters.documents, 1);
}

#[tokio::test]
async fn test_no_url_dispatched_twice() {
    let fetcher = create_test_site();
    SeedCrawl::new("https://example.edu/", create_test_settings(true, None))
        .run(&fetcher)
        .await;

    let requested = fetcher.requested();
    let unique: HashSet<_> = requested.iter().collect();
    assert_eq!(unique.len(), requested.len());
}

#[tokio::test]
async fn test_results_stay_in_scope_and_unique() {
    let fetcher = create_test_site();
    let result = SeedCrawl::new("https://example.edu/", create_test_settings(false, None))
        .run(&fetcher)
        .await;

    let mut seen = HashSet::new();
    for url in result.urls() {
        assert!(in_scope(url, &result.origin), "{} left the origin", url);
        assert!(seen.insert(url.clone()), "{} listed twice", url);
    }
    assert!(!fetcher
        .requested()
        .iter()
        .any(|u| u.starts_with("https://other.org")));
}

#[tokio::test]
async fn test_sentinel_never_dispatched() {
    let fetcher = create_test_site();
    let settings = create_test_settings(false, None);
    let result = SeedCrawl::new("https://example.edu/", Arc::clone(&settings))
        .run(&fetcher)
        .await;

    assert!(!fetcher.requested().iter().any(|u| u.ends_with("#page")));
    assert!(!result.urls().any(|u| settings.sentinel.matches(u)));
}

#[tokio::test]
async fn test_prefix_sentinel_mode() {
    let fetcher = SiteFetcher::default().page(
        "https://example.edu/",
        &["https://example.edu/list#page=2", "https://example.edu/list"],
    );
    let settings = Arc::new(CrawlSettings {
        sentinel: SentinelFilter::new("page", SentinelMatch::Prefix),
        ..CrawlSettings::default()
    });

    let result = SeedCrawl::new("https://example.edu/", settings)
        .run(&fetcher)
        .await;

    assert_eq!(fetcher.requested().len(), 2);
    assert_eq!(result.counters.failed, 1);
}

#[tokio::test]
async fn test_depth_cap_respected() {
    let fetcher = SiteFetcher::default()
        .page("https://example.edu/", &["https://example.edu/d1"])
        .page("https://example.edu/d1", &["https://example.edu/d2"])
        .page("https://example.edu/d2", &["https://example.edu/d3"])
        .page("https://example.edu/d3", &["https://example.edu/d4"]);

    let result = SeedCrawl::new("https://example.edu/", create_test_settings(false, Some(2)))
        .run(&fetcher)
        .await;

    assert_eq!(
        fetcher.requested(),
        vec![
            "https://example.edu/",
            "https://example.edu/d1",
            "https://example.edu/d2",
        ]
    );
    assert_eq!(result.len(), 3);
}

#[tokio::test]
async fn test_single_step_enqueues_only_in_scope_link() {
    let fetcher = SiteFetcher::default().page(
        "https://example.edu/a",
        &[
            "https://example.edu/a/b",
            "https://example.edu/a/b#page",
            "https://other.org/c",
        ],
    );
    let mut crawl = SeedCrawl::new("https://example.edu/a", create_test_settings(false, None));

    assert!(crawl.step(&fetcher).await);

    let normalizer = Normalizer::default();
    let frontier = crawl.frontier();
    assert_eq!(frontier.len(), 1);
    assert_eq!(
        frontier.state_of(&normalizer.normalize("https://example.edu/a/b")),
        UrlState::Queued
    );
    assert_eq!(
        frontier.state_of(&normalizer.normalize("https://example.edu/a/b#page")),
        UrlState::Unseen
    );
    assert_eq!(
        frontier.state_of(&normalizer.normalize("https://other.org/c")),
        UrlState::Unseen
    );
}

#[tokio::test]
async fn test_split_mode_document_partition() {
    let dir = TempDir::new().unwrap();
    let fetcher = create_test_site();
    let result = SeedCrawl::new("https://example.edu/", create_test_settings(true, None))
        .run(&fetcher)
        .await;

    let writer = ResultWriter::new(dir.path(), OutputMode::Split);
    let path = writer.write(&result).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    let documents = value["document"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0], "https://example.edu/files/catalog.pdf");
    assert!(!value["html"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u == "https://example.edu/files/catalog.pdf"));
    assert!(!fetcher.requested().iter().any(|u| u.ends_with(".pdf")));
}

#[tokio::test]
async fn test_same_origin_seeds_keep_separate_state() {
    let fetcher = create_overlapping_site();
    let settings = create_test_settings(false, None);

    let left = SeedCrawl::new("https://example.edu/left/", Arc::clone(&settings));
    let right = SeedCrawl::new("https://example.edu/right/", Arc::clone(&settings));
    let (left, right) = tokio::join!(drive(left, &fetcher), drive(right, &fetcher));

    let shared = settings.normalizer.normalize("https://example.edu/shared");
    assert_eq!(left.frontier().state_of(&shared), UrlState::Visited);
    assert_eq!(right.frontier().state_of(&shared), UrlState::Visited);

    let left = left.into_result();
    let right = right.into_result();
    assert_eq!(left.origin, right.origin);
    assert!(left.urls().any(|u| *u == shared));
    assert!(right.urls().any(|u| *u == shared));

    // Each seed dispatched the shared page itself
    let shared_fetches = fetcher
        .requested()
        .iter()
        .filter(|u| *u == "https://example.edu/shared")
        .count();
    assert_eq!(shared_fetches, 2);
}

#[tokio::test]
async fn test_same_origin_seeds_in_one_group() {
    let dir = TempDir::new().unwrap();
    let orchestrator = BatchOrchestrator::new(
        create_test_settings(false, None),
        Arc::new(create_overlapping_site()),
        ResultWriter::new(dir.path(), OutputMode::Flat),
        2,
        Duration::ZERO,
    );

    let report = orchestrator
        .run(vec![
            "https://example.edu/left/".to_string(),
            "https://example.edu/right/".to_string(),
        ])
        .await;

    assert_eq!(report.groups, 1);
    assert_eq!(report.succeeded(), 2);

    for outcome in &report.outcomes {
        let path = outcome.output.as_ref().unwrap();
        let urls: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(urls.len(), 3, "{:?}", urls);
        assert_eq!(urls[0], outcome.seed);
        assert!(urls.contains(&"https://example.edu/shared".to_string()));
    }
}

#[tokio::test]
async fn test_batch_writes_one_file_per_seed() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(
        SiteFetcher::default()
            .page("https://example.edu/left/", &["https://example.edu/left/1"])
            .page("https://example.edu/right/", &[])
            .page("https://other.org/", &[]),
    );

    let orchestrator = BatchOrchestrator::new(
        create_test_settings(false, None),
        fetcher,
        ResultWriter::new(dir.path(), OutputMode::Flat),
        2,
        Duration::from_millis(10),
    );

    let report = orchestrator
        .run(vec![
            "https://example.edu/left/".to_string(),
            "https://example.edu/right/".to_string(),
            "https://www.other.org/".to_string(),
        ])
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.groups, 2);
    assert_eq!(report.succeeded(), 3);

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 3);
    assert!(names[0].starts_with("example.edu_left_"));
    assert!(names[1].starts_with("example.edu_right_"));
    assert_eq!(names[2], "other.org_crawled_links.json");

    let left: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(&names[0])).unwrap())
            .unwrap();
    assert_eq!(left[0], "https://example.edu/left/");
}

#[tokio::test]
async fn test_http_fetcher_reports_internal_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    format!(
                        r##"<html><head><title>Home</title></head><body>
                        <a href="/page1">Page 1</a>
                        <a href="{}/page2#page">Page 2</a>
                        <a href="https://other.org/x">Elsewhere</a>
                        <a href="#top">Top</a>
                        </body></html>"##,
                        base_url
                    ),
                    "text/html",
                ),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_fetch_config(false)).unwrap();
    let result = fetcher.fetch(&format!("{}/", base_url)).await;

    assert!(result.success, "{}", result.error_message);
    let hrefs: Vec<&str> = result.internal_links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2#page", base_url),
        ]
    );
}

#[tokio::test]
async fn test_http_fetcher_status_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_fetch_config(false)).unwrap();
    let result = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_message, "HTTP 404");
}

#[tokio::test]
async fn test_http_fetcher_non_html_has_no_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<a href=\"/hidden\">not html</a>", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_fetch_config(false)).unwrap();
    let result = fetcher
        .fetch(&format!("{}/report.pdf", mock_server.uri()))
        .await;

    assert!(result.success);
    assert!(result.internal_links.is_empty());
}

#[tokio::test]
async fn test_http_fetcher_respects_robots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>hi</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_fetch_config(true)).unwrap();

    let blocked = fetcher
        .fetch(&format!("{}/private/area", mock_server.uri()))
        .await;
    assert!(!blocked.success);
    assert_eq!(blocked.error_message, "Disallowed by robots.txt");

    let allowed = fetcher.fetch(&format!("{}/public", mock_server.uri())).await;
    assert!(allowed.success);

    // robots.txt is fetched once per origin; `expect(1)` is verified on drop
}

#[tokio::test]
async fn test_http_fetcher_missing_robots_allows_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>home</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_fetch_config(true)).unwrap();
    let result = fetcher.fetch(&format!("{}/", mock_server.uri())).await;
    assert!(result.success);
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    r##"<html><body>
                    <a href="/page1">Page 1</a>
                    <a href="/page2">Page 2</a>
                    <a href="/page2#page">Page 2 again</a>
                    <a href="/gone">Gone</a>
                    </body></html>"##,
                    "text/html",
                ),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<html><body><a href="/">Home</a></body></html>"#, "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Content 2</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    // A soft 404: success status, "not found" body
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    "<html><body><h1>Not Found</h1>\
                     <p>The requested URL /gone was not found on this server.</p></body></html>",
                    "text/html",
                ),
        )
        .mount(&mock_server)
        .await;

    let fetcher = PlainHttp(HttpFetcher::new(&create_fetch_config(true)).unwrap());
    let result = SeedCrawl::new(&format!("{}/", base_url), create_test_settings(false, None))
        .run(&fetcher)
        .await;

    let secure = base_url.replacen("http://", "https://", 1);
    let urls: Vec<&str> = result.urls().map(|u| u.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", secure),
            format!("{}/page1", secure),
            format!("{}/page2", secure),
        ]
    );
    assert_eq!(result.counters.fetched, 4);
    assert_eq!(result.counters.not_found, 1);
    assert_eq!(result.counters.failed, 0);
}
