//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Level-by-level traversal of the listing pages
//! - Fetching, extraction, and pagination discovery per page
//! - Deduplication of extracted records by URL
//! - The duration enrichment pass
//! - The optional crawl deadline

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pagination::discover;
use crate::crawler::scheduler::{QueuedUrl, Scheduler};
use crate::enrich::DurationEnricher;
use crate::extract::extract;
use crate::output::DataQuality;
use crate::record::{RawRecord, Record};
use crate::state::{CrawlState, PageState};
use crate::url::normalize_url;
use crate::SumiError;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Counters describing one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Listing pages fetched successfully
    pub pages_fetched: usize,

    /// Listing pages whose fetch failed after retries
    pub pages_failed: usize,

    /// Fetched listing pages that yielded no records
    pub pages_empty: usize,

    /// Listing pages still queued when the deadline passed
    pub pages_abandoned: usize,

    /// Deepest level that was fetched
    pub deepest_level: u32,

    pub raw_records: usize,
    pub unique_records: usize,
    pub durations_resolved: usize,

    /// True if the deadline cut the crawl short
    pub incomplete: bool,
}

impl CrawlReport {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_failed: 0,
            pages_empty: 0,
            pages_abandoned: 0,
            deepest_level: 0,
            raw_records: 0,
            unique_records: 0,
            durations_resolved: 0,
            incomplete: false,
        }
    }

    fn record_page(&mut self, state: PageState) {
        match state {
            PageState::Extracted => self.pages_fetched += 1,
            PageState::Empty => {
                self.pages_fetched += 1;
                self.pages_empty += 1;
            }
            PageState::Failed => self.pages_failed += 1,
            PageState::Abandoned => self.pages_abandoned += 1,
        }
    }

    /// Wall-clock duration of the crawl, if it finished
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

/// Records produced by a crawl and its report
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub records: Vec<Record>,
    pub report: CrawlReport,
}

/// Main crawler coordinator structure
///
/// Owns the fetcher for the lifetime of one or more crawls. Every crawl
/// builds its own [`CrawlState`], so nothing carries over between runs.
pub struct Coordinator<F> {
    fetcher: F,
    config: CrawlerConfig,
}

impl<F: PageFetcher> Coordinator<F> {
    pub fn new(fetcher: F, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs a complete crawl
    ///
    /// 1. Traverses the catalog level by level from its root
    /// 2. Deduplicates the extracted records, first occurrence wins
    /// 3. Resolves durations for records that lack one
    ///
    /// Fails with [`SumiError::CrawlAborted`] only if the catalog root cannot
    /// be fetched. Any other page failure is logged and skipped.
    pub async fn run(&self) -> Result<CrawlOutcome, SumiError> {
        let root = normalize_url(&self.config.catalog_root)?;
        let deadline = self
            .config
            .deadline_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        tracing::info!(
            "Starting crawl of {} (max depth: {})",
            root,
            self.config.max_depth
        );

        let mut report = CrawlReport::start();
        let raw = self.traverse(&root, deadline, &mut report).await?;
        report.raw_records = raw.len();

        let mut records = dedup(raw);
        report.unique_records = records.len();
        tracing::info!("Found {} unique records", records.len());

        self.enrich(&mut records, deadline, &mut report).await;

        tracing::info!("Data quality: {}", DataQuality::from_records(&records));

        report.finished_at = Some(Utc::now());
        if report.incomplete {
            tracing::warn!("Crawl deadline reached, returning partial results");
        }

        Ok(CrawlOutcome { records, report })
    }

    /// Fetches every reachable listing page and collects raw records
    async fn traverse(
        &self,
        root: &Url,
        deadline: Option<Instant>,
        report: &mut CrawlReport,
    ) -> Result<Vec<RawRecord>, SumiError> {
        let mut state = CrawlState::new(root, self.config.max_depth);
        let mut scheduler = Scheduler::new(root.clone(), self.config.max_concurrent_pages_open);
        let mut raw = Vec::new();
        let fetcher = &self.fetcher;

        while let Some(level) = scheduler.next_level() {
            let level_size = level.len();
            let depth = level.first().map_or(0, |q| q.depth);
            tracing::info!("Fetching {} pages at depth {}", level_size, depth);

            let mut fetches = stream::iter(level)
                .map(|queued| async move {
                    let result = fetcher.fetch(&queued.url).await;
                    (queued, result)
                })
                .buffered(scheduler.max_concurrent());

            let mut consumed = 0;
            loop {
                let Some(next) = until(deadline, fetches.next()).await else {
                    if depth == 0 {
                        return Err(SumiError::CrawlAborted(format!(
                            "deadline passed before {} was fetched",
                            root
                        )));
                    }
                    let abandoned = level_size - consumed + scheduler.drain().len();
                    tracing::debug!("{} pages {}", abandoned, PageState::Abandoned);
                    for _ in 0..abandoned {
                        report.record_page(PageState::Abandoned);
                    }
                    report.incomplete = true;
                    return Ok(raw);
                };

                let Some((queued, result)) = next else {
                    break;
                };
                consumed += 1;

                let markup = match result {
                    Ok(markup) => markup,
                    Err(e) if queued.depth == 0 => {
                        return Err(SumiError::CrawlAborted(format!(
                            "catalog root unreachable: {}",
                            e
                        )));
                    }
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", queued.url, e);
                        tracing::debug!("{} {}", queued.url, PageState::Failed);
                        report.record_page(PageState::Failed);
                        continue;
                    }
                };

                report.deepest_level = report.deepest_level.max(queued.depth);
                let page_state =
                    process_page(&markup, &queued, &mut state, &mut scheduler, &mut raw);
                tracing::debug!("{} {}", queued.url, page_state);
                report.record_page(page_state);
            }
        }

        Ok(raw)
    }

    /// Resolves durations for records without one, preserving record order
    async fn enrich(
        &self,
        records: &mut [Record],
        deadline: Option<Instant>,
        report: &mut CrawlReport,
    ) {
        let pending: Vec<(usize, Url)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.duration_minutes.is_none())
            .filter_map(|(i, record)| Url::parse(&record.identity_url).ok().map(|url| (i, url)))
            .collect();

        if pending.is_empty() {
            return;
        }

        let total = pending.len();
        tracing::info!("Extracting durations for {} records", total);

        let enricher = DurationEnricher::new(&self.fetcher);
        let enricher = &enricher;
        let mut lookups = stream::iter(pending)
            .map(|(i, url)| async move { (i, enricher.resolve_duration(&url).await) })
            .buffered(self.config.max_concurrent_pages_open.max(1) as usize);

        let mut done = 0;
        loop {
            let Some(next) = until(deadline, lookups.next()).await else {
                tracing::warn!(
                    "Deadline reached after enriching {}/{} records",
                    done,
                    total
                );
                report.incomplete = true;
                break;
            };

            let Some((i, estimate)) = next else {
                break;
            };
            done += 1;
            tracing::debug!(
                "Resolved duration for record {}/{}: {}",
                done,
                total,
                records[i].name
            );

            if let Some(estimate) = estimate {
                if records[i].fill_duration(estimate.minutes) {
                    report.durations_resolved += 1;
                }
            }
        }
    }
}

/// Extracts records from a fetched page and queues its pagination
///
/// Pages at the depth limit are extracted but not expanded.
fn process_page(
    markup: &str,
    queued: &QueuedUrl,
    state: &mut CrawlState,
    scheduler: &mut Scheduler,
    raw: &mut Vec<RawRecord>,
) -> PageState {
    let extraction = extract(markup, &queued.url);
    let page_state = if extraction.is_miss() {
        tracing::info!("No records extracted from {}", queued.url);
        PageState::Empty
    } else {
        tracing::info!(
            "Extracted {} records from {}",
            extraction.records.len(),
            queued.url
        );
        PageState::Extracted
    };
    raw.extend(extraction.records);

    if !state.can_descend(queued.depth) {
        tracing::debug!("Depth limit reached at {}", queued.url);
        return page_state;
    }

    for url in discover(markup, &queued.url, state.visited()) {
        if state.mark_visited(&url) {
            tracing::debug!("Queueing {} at depth {}", url, queued.depth + 1);
            scheduler.add_to_frontier(QueuedUrl::new(url, queued.depth + 1));
        }
    }

    page_state
}

/// Keeps the first record seen for every URL
fn dedup(raw: Vec<RawRecord>) -> Vec<Record> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|record| seen.insert(record.url.clone()))
        .map(RawRecord::into_record)
        .collect()
}

/// Awaits `future`, giving up once `deadline` passes
async fn until<T>(deadline: Option<Instant>, future: impl Future<Output = T>) -> Option<T> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records every fetch
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
        fetched: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn page(mut self, url: &str, markup: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), markup.into());
            self
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages.get(url.as_str()).cloned().ok_or_else(|| SumiError::Fetch {
                url: url.to_string(),
                attempts: 1,
                cause: "not found".to_string(),
            })
        }
    }

    const ROOT: &str = "https://example.com/catalog/";

    fn config(max_depth: u32) -> CrawlerConfig {
        CrawlerConfig {
            catalog_root: ROOT.to_string(),
            max_depth,
            max_concurrent_pages_open: 2,
            ..CrawlerConfig::default()
        }
    }

    fn listing(rows: &[(&str, &str)], next: Option<&str>) -> String {
        let rows: String = rows
            .iter()
            .map(|(href, name)| {
                format!(
                    r#"<tr><td><a href="{href}">{name}</a></td><td></td><td></td><td>K</td></tr>"#
                )
            })
            .collect();
        let pager = next
            .map(|href| format!(r#"<ul class="pagination"><li><a href="{href}">Next</a></li></ul>"#))
            .unwrap_or_default();

        format!(
            r#"<table class="products-table"><tr><th>Name</th><th>Remote</th><th>Adaptive</th><th>Test Type</th></tr>{rows}</table>{pager}"#
        )
    }

    #[tokio::test]
    async fn test_dedup_across_pages_keeps_first() {
        let fetcher = MapFetcher::default()
            .page(
                ROOT,
                listing(&[("/view/a/", "Alpha"), ("/view/b/", "Beta")], Some("?start=12")),
            )
            .page(
                "https://example.com/catalog/?start=12",
                listing(&[("/view/a/", "Alpha Again")], None),
            )
            .page("https://example.com/view/a/", "<p>12 minutes</p>")
            .page("https://example.com/view/b/", "<p>nothing</p>");

        let outcome = Coordinator::new(fetcher, config(5)).run().await.unwrap();

        let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(outcome.records[0].duration_minutes, Some(12));
        assert_eq!(outcome.records[1].duration_minutes, None);
        assert_eq!(outcome.report.raw_records, 3);
        assert_eq!(outcome.report.unique_records, 2);
        assert_eq!(outcome.report.pages_fetched, 2);
        assert_eq!(outcome.report.durations_resolved, 1);
        assert!(!outcome.report.incomplete);
    }

    #[tokio::test]
    async fn test_depth_limit_stops_descent() {
        let fetcher = MapFetcher::default()
            .page(ROOT, listing(&[("/view/a/", "A")], Some("?p=1")))
            .page(
                "https://example.com/catalog/?p=1",
                listing(&[("/view/b/", "B")], Some("?p=2")),
            )
            .page(
                "https://example.com/catalog/?p=2",
                listing(&[("/view/c/", "C")], None),
            );

        let coordinator = Coordinator::new(fetcher, config(1));
        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.report.deepest_level, 1);
        assert!(!coordinator
            .fetcher
            .fetched()
            .contains(&"https://example.com/catalog/?p=2".to_string()));
    }

    #[tokio::test]
    async fn test_pagination_cycle_fetches_each_page_once() {
        let fetcher = MapFetcher::default()
            .page(ROOT, listing(&[("/view/a/", "A")], Some("?p=1")))
            .page(
                "https://example.com/catalog/?p=1",
                listing(&[("/view/b/", "B")], Some("/catalog/")),
            );

        let coordinator = Coordinator::new(fetcher, config(5));
        coordinator.run().await.unwrap();

        let fetched = coordinator.fetcher.fetched();
        assert_eq!(fetched.iter().filter(|u| u.as_str() == ROOT).count(), 1);
    }

    #[tokio::test]
    async fn test_root_failure_aborts() {
        let result = Coordinator::new(MapFetcher::default(), config(5)).run().await;
        assert!(matches!(result, Err(SumiError::CrawlAborted(_))));
    }

    #[tokio::test]
    async fn test_branch_failure_is_skipped() {
        let fetcher = MapFetcher::default().page(
            ROOT,
            listing(&[("/view/a/", "A")], Some("?missing=1")),
        );

        let outcome = Coordinator::new(fetcher, config(5)).run().await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.pages_failed, 1);
    }

    #[test]
    fn test_dedup_preserves_order() {
        let url = |s: &str| Url::parse(s).unwrap();
        let raw = vec![
            RawRecord::new("First", url("https://example.com/x/")).unwrap(),
            RawRecord::new("Second", url("https://example.com/y/")).unwrap(),
            RawRecord::new("Duplicate", url("https://example.com/x/")).unwrap(),
        ];

        let names: Vec<_> = dedup(raw).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
