//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the frontier, visited set and title index of one crawl
//! - `PageState`: the pipeline state of an individual URL

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
