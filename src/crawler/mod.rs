//! Crawler module for catalog fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page fetching over plain HTTP or a render service, with retries
//! - Pagination discovery
//! - Level-by-level scheduling
//! - Overall crawl coordination and the cache-or-crawl entry points

mod coordinator;
mod fetcher;
mod pagination;
mod retry;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlReport};
pub use fetcher::{
    build_fetcher, build_http_client, HttpFetcher, PageFetcher, RenderedFetcher,
};
pub use pagination::discover;
pub use retry::{RetryPolicy, RetryingFetcher};
pub use scheduler::{QueuedUrl, Scheduler};

use crate::config::Config;
use crate::record::{sample_records, Record};
use crate::storage::{load_fresh, open_store, FreshnessPolicy, RecordStore};
use chrono::Utc;

/// Where a loaded catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Crawled during this call
    Crawl,
    /// Served from a fresh cache snapshot
    Cache,
    /// Built-in sample records after the crawl failed
    Sample,
}

/// Result of loading the catalog
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub records: Vec<Record>,
    pub source: CatalogSource,
    /// Present when a crawl ran, even if it failed to produce records
    pub report: Option<CrawlReport>,
}

impl CatalogLoad {
    pub fn was_freshly_crawled(&self) -> bool {
        self.source == CatalogSource::Crawl
    }

    /// Splits into the records and the freshly-crawled flag
    pub fn into_parts(self) -> (Vec<Record>, bool) {
        let fresh = self.was_freshly_crawled();
        (self.records, fresh)
    }
}

/// Loads the catalog from cache or by crawling
///
/// 1. Unless `force_refresh` is set, a fresh cached snapshot is returned
/// 2. Otherwise the catalog is crawled and a non-empty result is saved
/// 3. If the crawl aborts or finds nothing, the sample records are returned
///
/// Never fails; every error is logged and degrades to the next step.
pub async fn load_catalog<F, S>(
    fetcher: F,
    store: &S,
    config: &Config,
    force_refresh: bool,
) -> CatalogLoad
where
    F: PageFetcher,
    S: RecordStore + ?Sized,
{
    if !force_refresh {
        let policy = FreshnessPolicy::from(&config.cache);
        if let Some(snapshot) = load_fresh(store, &policy, Utc::now()) {
            tracing::info!("Loaded {} records from cache", snapshot.records.len());
            return CatalogLoad {
                records: snapshot.records,
                source: CatalogSource::Cache,
                report: None,
            };
        }
    }

    tracing::info!("Starting fresh crawl of the catalog");
    let coordinator = Coordinator::new(fetcher, config.crawler.clone());

    let report = match coordinator.run().await {
        Ok(outcome) if !outcome.records.is_empty() => {
            if let Err(e) = store.save(&outcome.records) {
                tracing::error!("Failed to save crawled records: {}", e);
            }
            return CatalogLoad {
                records: outcome.records,
                source: CatalogSource::Crawl,
                report: Some(outcome.report),
            };
        }
        Ok(outcome) => {
            tracing::warn!("Crawl finished without any records");
            Some(outcome.report)
        }
        Err(e) => {
            tracing::error!("Error during crawl: {}", e);
            None
        }
    };

    tracing::info!("Loading sample records");
    CatalogLoad {
        records: sample_records(),
        source: CatalogSource::Sample,
        report,
    }
}

/// Runs the cache-or-crawl flow with injected collaborators
///
/// Returns the records and whether they were crawled during this call.
pub async fn run_crawl_with<F, S>(
    fetcher: F,
    store: &S,
    config: &Config,
    force_refresh: bool,
) -> (Vec<Record>, bool)
where
    F: PageFetcher,
    S: RecordStore + ?Sized,
{
    load_catalog(fetcher, store, config, force_refresh)
        .await
        .into_parts()
}

/// Runs the cache-or-crawl flow with the configured fetcher and JSON cache
///
/// # Example
///
/// ```no_run
/// use sumi_catalog::{run_crawl, Config};
///
/// # async fn example() {
/// let (records, fresh) = run_crawl(&Config::default(), false).await;
/// println!("{} records ({})", records.len(), if fresh { "crawled" } else { "loaded" });
/// # }
/// ```
pub async fn run_crawl(config: &Config, force_refresh: bool) -> (Vec<Record>, bool) {
    let store = open_store(&config.cache);

    match build_fetcher(config) {
        Ok(fetcher) => run_crawl_with(fetcher, &store, config, force_refresh).await,
        Err(e) => {
            tracing::error!("Failed to build fetcher: {}", e);
            (sample_records(), false)
        }
    }
}
