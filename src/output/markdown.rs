//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a catalog,
//! including data quality, category breakdown, crawl counters, and the
//! records themselves.

use crate::output::traits::{CatalogSummary, OutputHandler, OutputResult};
use crate::record::Record;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes catalog summaries as markdown files
#[derive(Debug, Clone)]
pub struct MarkdownOutput {
    path: PathBuf,
}

impl MarkdownOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownOutput {
    fn write_catalog(&self, records: &[Record], summary: &CatalogSummary) -> OutputResult<()> {
        generate_markdown_summary(records, summary, &self.path)
    }
}

/// Generates a markdown summary and writes it to `output_path`
pub fn generate_markdown_summary(
    records: &[Record],
    summary: &CatalogSummary,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(records, summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a catalog summary as markdown
pub fn format_markdown_summary(records: &[Record], summary: &CatalogSummary) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Sumi-Catalog Summary\n\n");

    // Load metadata
    md.push_str("## Catalog Information\n\n");
    md.push_str(&format!("- **Generated**: {}\n", summary.generated_at));
    md.push_str(&format!("- **Source**: {}\n", summary.source));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Data quality
    let quality = &summary.quality;
    md.push_str("## Data Quality\n\n");
    md.push_str(&format!("- **Total Records**: {}\n", quality.total));
    md.push_str(&format!(
        "- **With Duration**: {} ({:.1}%)\n",
        quality.with_duration,
        quality.percentage(quality.with_duration)
    ));
    md.push_str(&format!(
        "- **Remote Testing**: {} ({:.1}%)\n",
        quality.remote_testing,
        quality.percentage(quality.remote_testing)
    ));
    md.push_str(&format!(
        "- **Adaptive/IRT**: {} ({:.1}%)\n\n",
        quality.adaptive_irt,
        quality.percentage(quality.adaptive_irt)
    ));

    // Crawl counters
    if let Some(report) = &summary.report {
        md.push_str("## Crawl Report\n\n");
        md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
        if let Some(elapsed) = report.elapsed() {
            md.push_str(&format!(
                "- **Duration**: {} seconds\n",
                elapsed.num_seconds()
            ));
        }
        md.push_str(&format!(
            "- **Page Success Rate**: {:.2}%\n",
            summary.page_success_rate()
        ));
        if report.incomplete {
            md.push_str("- **Incomplete**: deadline reached before the crawl finished\n");
        }
        md.push('\n');

        md.push_str("| Counter | Value |\n");
        md.push_str("|---------|-------|\n");
        md.push_str(&format!("| Pages Fetched | {} |\n", report.pages_fetched));
        md.push_str(&format!("| Pages Failed | {} |\n", report.pages_failed));
        md.push_str(&format!("| Pages Without Records | {} |\n", report.pages_empty));
        md.push_str(&format!("| Pages Abandoned | {} |\n", report.pages_abandoned));
        md.push_str(&format!("| Deepest Level | {} |\n", report.deepest_level));
        md.push_str(&format!("| Raw Records | {} |\n", report.raw_records));
        md.push_str(&format!("| Unique Records | {} |\n", report.unique_records));
        md.push_str(&format!(
            "| Durations Resolved | {} |\n\n",
            report.durations_resolved
        ));
    }

    // Category breakdown
    if !summary.category_counts.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Records |\n");
        md.push_str("|----------|---------|\n");
        for (label, count) in &summary.category_counts {
            md.push_str(&format!("| {} | {} |\n", label, count));
        }
        md.push('\n');
    }

    // Records
    if !records.is_empty() {
        md.push_str("## Records\n\n");
        md.push_str("| Name | Duration | Remote | Adaptive | Test Type |\n");
        md.push_str("|------|----------|--------|----------|-----------|\n");
        for record in records {
            let duration = record
                .duration_minutes
                .map(|m| format!("{} min", m))
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {} |\n",
                escape_cell(&record.name),
                record.identity_url,
                duration,
                yes_no(record.remote_testing),
                yes_no(record.adaptive_irt),
                escape_cell(&record.categories.join(", "))
            ));
        }
        md.push('\n');
    }

    md
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Escapes pipes so cell text cannot break the table
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::stats::{category_counts, DataQuality};
    use crate::record::sample_records;
    use tempfile::TempDir;

    fn create_test_summary(records: &[Record]) -> CatalogSummary {
        let mut summary = CatalogSummary::new();
        summary.generated_at = "2024-01-01T00:00:00Z".to_string();
        summary.source = "cache".to_string();
        summary.config_hash = Some("abc123".to_string());
        summary.quality = DataQuality::from_records(records);
        summary.category_counts = category_counts(records);
        summary
    }

    #[test]
    fn test_format_markdown_summary() {
        let records = sample_records();
        let markdown = format_markdown_summary(&records, &create_test_summary(&records));

        assert!(markdown.contains("# Sumi-Catalog Summary"));
        assert!(markdown.contains("- **Source**: cache"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("- **Total Records**: 5"));
        assert!(markdown.contains("| Ability & Aptitude | 3 |"));
        assert!(!markdown.contains("## Crawl Report"));
    }

    #[test]
    fn test_markdown_lists_records() {
        let records = sample_records();
        let markdown = format_markdown_summary(&records, &create_test_summary(&records));

        assert!(markdown.contains(
            "| [Work Strengths Questionnaire](https://www.shl.com/solutions/products/work-strengths-questionnaire/) | 25 min | Yes | Yes | Personality & Behavior |"
        ));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("A | B"), "A \\| B");
    }

    #[test]
    fn test_write_markdown_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.md");
        let records = sample_records();

        MarkdownOutput::new(&path)
            .write_catalog(&records, &create_test_summary(&records))
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Sumi-Catalog Summary"));
    }
}
