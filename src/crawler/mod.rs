//! Crawler module for fetching pages and mirroring them as Markdown
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and assets
//! - HTML parsing, asset localization and Markdown rendering
//! - Politeness delays and interrupt handling
//! - Overall crawl coordination

mod assets;
mod coordinator;
mod fetcher;
mod parser;
mod shutdown;
mod throttle;

pub use assets::AssetResolver;
pub use coordinator::{run_crawl, Coordinator, CrawlReport, StopReason};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchedPage, TransportError};
pub use parser::{parse_html, render_markdown, rewrite_references, ParsedPage, Rewrite};
pub use shutdown::ShutdownController;
pub use throttle::Throttle;
