//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! catalog summary they render.

use crate::crawler::CrawlReport;
use crate::output::stats::DataQuality;
use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary of a loaded catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogSummary {
    // Load metadata
    pub generated_at: String,
    pub source: String,
    pub config_hash: Option<String>,

    // Data quality counters
    pub quality: DataQuality,

    // Category label -> record count, most frequent first
    pub category_counts: Vec<(String, usize)>,

    // Crawl counters, when a crawl ran
    pub report: Option<CrawlReport>,
}

impl CatalogSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the share of listing pages fetched successfully as a percentage
    pub fn page_success_rate(&self) -> f64 {
        let Some(report) = &self.report else {
            return 0.0;
        };
        let attempted = report.pages_fetched + report.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (report.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Trait for output handlers
///
/// Output handlers write a catalog to some destination.
pub trait OutputHandler {
    /// Writes the records and their summary
    fn write_catalog(&self, records: &[Record], summary: &CatalogSummary) -> OutputResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_summary_new() {
        let summary = CatalogSummary::new();
        assert_eq!(summary.quality.total, 0);
        assert!(summary.category_counts.is_empty());
    }

    #[test]
    fn test_page_success_rate_without_crawl() {
        assert_eq!(CatalogSummary::new().page_success_rate(), 0.0);
    }
}
