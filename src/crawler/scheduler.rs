//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - FIFO frontier of listing pages tagged with their depth
//! - Handing out one depth level at a time
//! - The concurrency bound applied while a level is fetched

use std::collections::VecDeque;
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: Url,

    /// Pagination hops from the catalog root
    pub depth: u32,
}

impl QueuedUrl {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// Scheduler manages the frontier queue
///
/// Pages are enqueued in discovery order. Because pages at depth `d + 1` are
/// only discovered while depth `d` is processed, the frontier is always
/// sorted by depth and [`Scheduler::next_level`] yields complete levels.
#[derive(Debug)]
pub struct Scheduler {
    /// Frontier queue of URLs to fetch
    frontier: VecDeque<QueuedUrl>,

    /// Maximum pages fetched at once
    max_concurrent: usize,
}

impl Scheduler {
    /// Creates a scheduler whose frontier holds only the root
    pub fn new(root: Url, max_concurrent: u32) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(QueuedUrl::new(root, 0));

        Self {
            frontier,
            max_concurrent: max_concurrent.max(1) as usize,
        }
    }

    /// Adds a discovered URL to the back of the frontier
    pub fn add_to_frontier(&mut self, url: QueuedUrl) {
        debug_assert!(
            self.frontier.back().map_or(true, |last| last.depth <= url.depth),
            "frontier must stay sorted by depth"
        );
        self.frontier.push_back(url);
    }

    /// Removes and returns every queued URL at the shallowest depth
    ///
    /// Returns None when the frontier is empty.
    pub fn next_level(&mut self) -> Option<Vec<QueuedUrl>> {
        let depth = self.frontier.front()?.depth;

        let mut level = Vec::new();
        while self.frontier.front().is_some_and(|q| q.depth == depth) {
            if let Some(queued) = self.frontier.pop_front() {
                level.push(queued);
            }
        }

        Some(level)
    }

    /// Empties the frontier, returning what was still queued
    pub fn drain(&mut self) -> Vec<QueuedUrl> {
        self.frontier.drain(..).collect()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
