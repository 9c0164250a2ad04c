//! CSV export of catalog records
//!
//! One row per record with the cache's field names as headers. Categories
//! are joined into a single `", "`-separated cell.

use crate::output::traits::{CatalogSummary, OutputHandler, OutputResult};
use crate::record::Record;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes records as CSV
#[derive(Debug, Clone)]
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for CsvOutput {
    fn write_catalog(&self, records: &[Record], _summary: &CatalogSummary) -> OutputResult<()> {
        export_csv(records, &self.path)
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    url: &'a str,
    remote_testing: bool,
    adaptive_irt: bool,
    duration: Option<u32>,
    test_type: String,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            name: &record.name,
            url: &record.identity_url,
            remote_testing: record.remote_testing,
            adaptive_irt: record.adaptive_irt,
            duration: record.duration_minutes,
            test_type: record.categories.join(", "),
        }
    }
}

/// Writes `records` to a CSV file at `path`
pub fn export_csv(records: &[Record], path: &Path) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}
