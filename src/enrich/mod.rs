//! Per-record duration enrichment
//!
//! Records extracted from listing tables never carry a duration. The enricher
//! fetches each record's detail page and resolves one from its markup. A
//! failed fetch or an unresolvable page leaves the duration unknown.

mod patterns;

pub use patterns::{
    match_patterns, resolve_from_markup, title_default, DurationEstimate, DurationSource,
};

use crate::crawler::PageFetcher;
use url::Url;

/// Resolves durations from detail pages through a fetcher
pub struct DurationEnricher<'a, F: ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher + ?Sized> DurationEnricher<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Fetches the detail page and resolves a duration from it
    ///
    /// Never fails: fetch errors are logged and reported as unknown.
    pub async fn resolve_duration(&self, record_url: &Url) -> Option<DurationEstimate> {
        let markup = match self.fetcher.fetch(record_url).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Could not fetch detail page {}: {}", record_url, e);
                return None;
            }
        };

        let estimate = resolve_from_markup(&markup);
        match estimate {
            Some(found) => tracing::debug!(
                "Duration for {}: {} min ({})",
                record_url,
                found.minutes,
                found.source.as_str()
            ),
            None => tracing::debug!("No duration found on {}", record_url),
        }
        estimate
    }
}
