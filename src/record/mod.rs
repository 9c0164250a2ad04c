//! Catalog record types
//!
//! A [`RawRecord`] is what the extractor produces from one table row or card:
//! not yet deduplicated and not yet enriched. A [`Record`] is the normalized
//! catalog entry that leaves the crawler and is persisted in the cache.

mod sample;

pub use sample::sample_records;

use serde::{Deserialize, Serialize};
use url::Url;

/// Category used when a row or card carries no category signal
pub const UNSPECIFIED_CATEGORY: &str = "Unspecified";

/// A record extracted from listing markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub name: String,
    /// Absolute link to the detail page; the record's identity
    pub url: Url,
    pub remote_testing: bool,
    pub adaptive_irt: bool,
    /// Only cards may carry a duration at extraction time
    pub duration: Option<u32>,
    pub categories: Vec<String>,
}

impl RawRecord {
    /// Builds a raw record, rejecting blank names
    pub fn new(name: &str, url: Url) -> Option<Self> {
        let name = collapse_whitespace(name);
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            url,
            remote_testing: false,
            adaptive_irt: false,
            duration: None,
            categories: Vec::new(),
        })
    }

    /// Converts into a normalized record
    pub fn into_record(self) -> Record {
        let categories = if self.categories.is_empty() {
            vec![UNSPECIFIED_CATEGORY.to_string()]
        } else {
            self.categories
        };

        Record {
            name: self.name,
            identity_url: self.url.to_string(),
            remote_testing: self.remote_testing,
            adaptive_irt: self.adaptive_irt,
            duration_minutes: self.duration.filter(|minutes| *minutes > 0),
            categories,
        }
    }
}

/// A normalized catalog entry
///
/// Serialized with the cache artifact's field names: `name`, `url`,
/// `remote_testing`, `adaptive_irt`, `duration`, `test_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    #[serde(rename = "url")]
    pub identity_url: String,

    #[serde(default)]
    pub remote_testing: bool,

    #[serde(default)]
    pub adaptive_irt: bool,

    #[serde(rename = "duration", default)]
    pub duration_minutes: Option<u32>,

    #[serde(rename = "test_type", default)]
    pub categories: Vec<String>,
}

impl Record {
    /// Fills the duration only when none is set yet
    ///
    /// Returns true if the value was applied.
    pub fn fill_duration(&mut self, minutes: u32) -> bool {
        if self.duration_minutes.is_some() || minutes == 0 {
            return false;
        }
        self.duration_minutes = Some(minutes);
        true
    }

    /// Checks the record invariants: non-empty name, absolute HTTP(S) URL,
    /// at least one category, positive duration if present
    pub fn is_valid(&self) -> bool {
        let url_ok = Url::parse(&self.identity_url)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .unwrap_or(false);

        !self.name.trim().is_empty()
            && url_ok
            && !self.categories.is_empty()
            && self.duration_minutes != Some(0)
    }
}

/// Trims and collapses runs of whitespace into single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
