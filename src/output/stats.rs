//! Data-quality statistics over catalog records
//!
//! This module counts how complete a set of records is and prints the
//! report shown after a crawl and by `--stats`.

use crate::record::Record;
use std::fmt;

/// How many records carry each optional attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Total number of records
    pub total: usize,

    /// Records with a known duration
    pub with_duration: usize,

    /// Records supporting remote testing
    pub remote_testing: usize,

    /// Records that are adaptive/IRT
    pub adaptive_irt: usize,
}

impl DataQuality {
    /// Counts the attributes over `records`
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            total: records.len(),
            with_duration: records
                .iter()
                .filter(|r| r.duration_minutes.is_some())
                .count(),
            remote_testing: records.iter().filter(|r| r.remote_testing).count(),
            adaptive_irt: records.iter().filter(|r| r.adaptive_irt).count(),
        }
    }

    /// Share of `count` in the total as a percentage
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (count as f64 / self.total as f64) * 100.0
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} have duration, {} remote testing, {} adaptive/IRT",
            self.with_duration, self.total, self.remote_testing, self.adaptive_irt
        )
    }
}

/// Counts records per category label, most frequent first
///
/// Ties are broken alphabetically.
pub fn category_counts(records: &[Record]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for category in records.iter().flat_map(|r| &r.categories) {
        match counts.iter_mut().find(|(label, _)| label == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category.clone(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Prints data-quality statistics and the first few records to stdout
pub fn print_statistics(records: &[Record]) {
    let quality = DataQuality::from_records(records);

    println!("=== Catalog Statistics ===\n");

    println!("Data quality:");
    for (label, count) in [
        ("have duration", quality.with_duration),
        ("support remote testing", quality.remote_testing),
        ("are adaptive/IRT", quality.adaptive_irt),
    ] {
        println!(
            "  - {}/{} ({:.1}%) {}",
            count,
            quality.total,
            quality.percentage(count),
            label
        );
    }
    println!();

    let categories = category_counts(records);
    if !categories.is_empty() {
        println!("Categories:");
        for (label, count) in categories {
            println!("  {}: {}", label, count);
        }
        println!();
    }

    println!("Sample records:");
    for (i, record) in records.iter().take(5).enumerate() {
        println!("{}. {}", i + 1, record.name);
        println!("   URL: {}", record.identity_url);
        match record.duration_minutes {
            Some(minutes) => println!("   Duration: {} minutes", minutes),
            None => println!("   Duration: unknown"),
        }
        println!(
            "   Remote: {}, Adaptive: {}",
            record.remote_testing, record.adaptive_irt
        );
        println!("   Test Type: {}", record.categories.join(", "));
    }
}
