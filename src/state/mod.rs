//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Tracks the outcome of individual listing pages
//! - `CrawlState`: Visited-URL set and depth budget owned by the coordinator

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
