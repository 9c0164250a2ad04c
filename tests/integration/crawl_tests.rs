//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full cache-or-crawl cycle end-to-end.

use std::collections::HashSet;
use std::time::Duration;
use sumi_catalog::config::{Config, FetchStrategy, RenderConfig, RetryConfig};
use sumi_catalog::crawler::{build_fetcher, load_catalog, CatalogSource};
use sumi_catalog::record::sample_records;
use sumi_catalog::storage::{JsonFileStore, RecordStore};
use sumi_catalog::{run_crawl, Record};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str =
    "<tr><th>Product Name</th><th>Remote Testing</th><th>Adaptive/IRT</th><th>Test Type</th></tr>";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, cache_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.catalog_root = format!("{}/catalog/", server.uri());
    config.crawler.fetch_strategy = FetchStrategy::Http;
    config.crawler.max_concurrent_pages_open = 2;
    config.retry = RetryConfig {
        max_attempts: 2,
        base_delay_ms: 1,
        max_delay_ms: 2,
    };
    config.cache.path = cache_dir
        .path()
        .join("catalog_records.json")
        .to_string_lossy()
        .into_owned();
    config
}

/// Builds a listing page with one row per `(href, name, codes)`
fn listing(rows: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let rows: String = rows
        .iter()
        .map(|(href, name, codes)| {
            format!(
                r#"<tr><td><a href="{href}">{name}</a></td><td><span class="check-icon"></span></td><td></td><td>{codes}</td></tr>"#
            )
        })
        .collect();
    let pager = next
        .map(|href| format!(r#"<nav class="pagination"><a href="{href}">Next</a></nav>"#))
        .unwrap_or_default();

    format!(
        r#"<html><body><table class="products-table">{HEADER}{rows}</table>{pager}</body></html>"#
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_dedups_across_pagination() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    mount_page(
        &server,
        "/catalog/",
        listing(
            &[("/view/opq/", "OPQ32r", "P"), ("/view/verify/", "Verify G+", "A")],
            Some("/catalog/page/2/"),
        ),
    )
    .await;
    mount_page(
        &server,
        "/catalog/page/2/",
        listing(&[("/view/opq/", "OPQ32r (duplicate)", "K")], None),
    )
    .await;
    mount_page(
        &server,
        "/view/opq/",
        "<html><head><title>OPQ</title></head><body><h1>Personality Questionnaire</h1></body></html>"
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/view/verify/",
        "<html><body><p>Duration: 45</p></body></html>".to_string(),
    )
    .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(fresh);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(Record::is_valid));

    let urls: HashSet<_> = records.iter().map(|r| r.identity_url.as_str()).collect();
    assert_eq!(urls.len(), records.len());

    assert_eq!(records[0].name, "OPQ32r");
    assert_eq!(records[0].categories, vec!["Personality & Behavior"]);
    assert_eq!(records[0].duration_minutes, Some(25));
    assert!(records[0].remote_testing);
    assert!(!records[0].adaptive_irt);

    assert_eq!(records[1].name, "Verify G+");
    assert_eq!(records[1].duration_minutes, Some(45));
    assert_eq!(
        records[1].identity_url,
        format!("{}/view/verify/", server.uri())
    );

    // The crawl result was cached
    let snapshot = JsonFileStore::new(&config.cache.path)
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.records, records);
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &cache_dir);
    config.crawler.max_depth = 2;

    mount_page(
        &server,
        "/catalog/",
        listing(&[("/view/a/", "A", "A")], Some("/catalog/1/")),
    )
    .await;
    mount_page(
        &server,
        "/catalog/1/",
        listing(&[("/view/b/", "B", "B")], Some("/catalog/2/")),
    )
    .await;
    mount_page(
        &server,
        "/catalog/2/",
        listing(&[("/view/c/", "C", "C")], Some("/catalog/3/")),
    )
    .await;

    // Depth 3 must never be requested
    Mock::given(method("GET"))
        .and(path("/catalog/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(fresh);
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_unreachable_root_returns_sample_records() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(!fresh);
    assert_eq!(records, sample_records());
    assert!(!cache_dir.path().join("catalog_records.json").exists());
}

#[tokio::test]
async fn test_transient_root_failure_is_retried() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/catalog/",
        listing(&[("/view/a/", "Recovered", "K")], None),
    )
    .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(fresh);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Recovered");
}

#[tokio::test]
async fn test_fresh_cache_is_reused() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    let mut cached = sample_records();
    cached.push(cached[0].clone());
    cached[5].identity_url = "https://example.com/extra/".to_string();
    JsonFileStore::new(&config.cache.path).save(&cached).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(!fresh);
    assert_eq!(records, cached);
}

#[tokio::test]
async fn test_small_cache_triggers_crawl() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    // Exactly five records is not enough to reuse
    JsonFileStore::new(&config.cache.path)
        .save(&sample_records())
        .unwrap();
    mount_page(
        &server,
        "/catalog/",
        listing(&[("/view/a/", "Crawled", "S")], None),
    )
    .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(fresh);
    assert_eq!(records[0].name, "Crawled");
}

#[tokio::test]
async fn test_force_refresh_ignores_fresh_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &cache_dir);

    let mut cached = sample_records();
    cached.extend(sample_records().into_iter().map(|mut r| {
        r.identity_url.push_str("copy/");
        r
    }));
    JsonFileStore::new(&config.cache.path).save(&cached).unwrap();

    mount_page(
        &server,
        "/catalog/",
        listing(&[("/view/a/", "Forced", "D")], None),
    )
    .await;

    let (records, fresh) = run_crawl(&config, true).await;

    assert!(fresh);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].categories, vec!["Development & 360"]);
}

#[tokio::test]
async fn test_deadline_returns_partial_results() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &cache_dir);
    config.crawler.deadline_secs = Some(1);

    mount_page(
        &server,
        "/catalog/",
        listing(&[("/view/a/", "Before Deadline", "A")], Some("/catalog/slow/")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalog/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&[("/view/b/", "Too Late", "A")], None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = build_fetcher(&config).unwrap();
    let store = JsonFileStore::new(&config.cache.path);
    let load = load_catalog(fetcher, &store, &config, true).await;

    assert_eq!(load.source, CatalogSource::Crawl);
    assert_eq!(load.records.len(), 1);
    assert_eq!(load.records[0].name, "Before Deadline");

    let report = load.report.unwrap();
    assert!(report.incomplete);
    assert_eq!(report.pages_abandoned, 1);
}

#[tokio::test]
async fn test_rendered_strategy_uses_render_service() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &cache_dir);
    config.crawler.fetch_strategy = FetchStrategy::Rendered;
    config.render = Some(RenderConfig {
        endpoint: format!("{}/content", server.uri()),
        settle_min_ms: 1,
        settle_max_ms: 2,
    });

    let root = config.crawler.catalog_root.clone();
    Mock::given(method("POST"))
        .and(path("/content"))
        .and(body_partial_json(serde_json::json!({ "url": root })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&[("/view/a/", "Rendered", "E")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Completed in 15 minutes</p></body></html>"),
        )
        .mount(&server)
        .await;

    let (records, fresh) = run_crawl(&config, false).await;

    assert!(fresh);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Rendered");
    assert_eq!(records[0].categories, vec!["Assessment Exercises"]);
    assert_eq!(records[0].duration_minutes, Some(15));
}
