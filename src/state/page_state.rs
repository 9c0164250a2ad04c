/// Page outcome definitions for tracking crawl progress
///
/// This module defines the states a fetched or dropped listing page ends up in.
use std::fmt;

/// Final state of a listing page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Success States =====
    /// Page was fetched and yielded at least one record
    Extracted,

    /// Page was fetched but no strategy produced a record
    Empty,

    // ===== Error States =====
    /// Page fetch failed after exhausting retries
    Failed,

    // ===== Special States =====
    /// Page was still queued when the crawl deadline passed
    Abandoned,
}

impl PageState {
    /// Converts the page state to its log representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Empty => "empty",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
