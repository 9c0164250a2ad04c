//! Output module for catalog summaries and exports
//!
//! This module handles:
//! - Data-quality statistics over records
//! - Generating markdown summaries of a catalog
//! - Exporting records as CSV

mod csv_export;
mod markdown;
pub mod stats;
mod traits;

pub use csv_export::{export_csv, CsvOutput};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutput};
pub use stats::{category_counts, print_statistics, DataQuality};
pub use traits::{CatalogSummary, OutputError, OutputHandler, OutputResult};

use crate::crawler::CrawlReport;
use crate::record::Record;
use chrono::Utc;

/// Builds the summary of a catalog
///
/// `source` names where the records came from; `report` is present only when
/// a crawl ran.
pub fn generate_summary(
    records: &[Record],
    source: &str,
    report: Option<CrawlReport>,
    config_hash: Option<String>,
) -> CatalogSummary {
    CatalogSummary {
        generated_at: Utc::now().to_rfc3339(),
        source: source.to_string(),
        config_hash,
        quality: DataQuality::from_records(records),
        category_counts: category_counts(records),
        report,
    }
}

/// Writes the catalog through every handler, stopping at the first failure
pub fn write_all(
    handlers: &[&dyn OutputHandler],
    records: &[Record],
    summary: &CatalogSummary,
) -> OutputResult<()> {
    for handler in handlers {
        handler.write_catalog(records, summary)?;
    }
    Ok(())
}
