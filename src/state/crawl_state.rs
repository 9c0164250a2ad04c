//! Per-invocation traversal state
//!
//! Created when a crawl starts and dropped when it ends. Only the crawl
//! coordinator holds it, so no locking is involved.

use std::collections::HashSet;
use url::Url;

/// Visited-URL set and depth budget of one crawl
#[derive(Debug, Clone)]
pub struct CrawlState {
    visited: HashSet<Url>,
    max_depth: u32,
}

impl CrawlState {
    /// Starts a crawl at `root`, which counts as visited from the outset
    pub fn new(root: &Url, max_depth: u32) -> Self {
        let mut visited = HashSet::new();
        visited.insert(root.clone());
        Self { visited, max_depth }
    }

    /// Marks a URL as visited
    ///
    /// Returns false if it had already been fetched or enqueued.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.clone())
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    /// Remaining pagination hops for a page found at `depth`
    pub fn budget_at(&self, depth: u32) -> u32 {
        self.max_depth.saturating_sub(depth)
    }

    /// Returns true if pages at `depth` may still be expanded
    pub fn can_descend(&self, depth: u32) -> bool {
        self.budget_at(depth) > 0
    }
}
