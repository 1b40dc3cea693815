//! Configuration module
//!
//! This module handles loading, parsing, and validating crawl configuration.
//! Settings come from an optional TOML file; the CLI overlays its flags on top
//! and then runs [`validate`].
//!
//! # Example
//!
//! ```no_run
//! use site2md::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawling {} into {}", config.crawler.start_url, config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CheckpointConfig, Config, CrawlerConfig, OutputConfig, DEFAULT_CHECKPOINT_NAME,
    MAX_DELAY_SECS,
};

// Re-export parser functions
pub use parser::{load_config, read_config};
pub use validation::{validate, validate_start_url};
