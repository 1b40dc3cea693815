use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the checkpoint document inside the output directory
pub const DEFAULT_CHECKPOINT_NAME: &str = ".crawl_state.json";

/// Longest pause between requests (seconds), for both `delay` and `jitter`
/// and for any robots.txt crawl-delay
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
}

impl Config {
    /// Creates a default configuration for the given start URL
    pub fn for_url(start_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.crawler.start_url = start_url.into();
        config
    }

    /// Path of the checkpoint document, defaulting to `<output>/.crawl_state.json`
    pub fn checkpoint_path(&self) -> PathBuf {
        self.checkpoint
            .path
            .clone()
            .unwrap_or_else(|| self.output.directory.join(DEFAULT_CHECKPOINT_NAME))
    }

    /// Root directory for generated documents and assets
    pub fn output_dir(&self) -> &Path {
        &self.output.directory
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; the crawl never leaves its network location
    #[serde(rename = "start-url", default)]
    pub start_url: String,

    /// Page budget: the crawl stops once this many URLs have been visited
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Whether robots.txt is fetched and obeyed
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    /// User-Agent header and robots.txt identity
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Base delay between requests (seconds)
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Maximum symmetric random jitter added to the delay (seconds)
    #[serde(default)]
    pub jitter: f64,

    /// Timeout for page fetches (seconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Timeout for asset downloads (seconds)
    #[serde(rename = "asset-timeout", default = "default_asset_timeout")]
    pub asset_timeout: u64,
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout)
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_secs(self.asset_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_pages: default_max_pages(),
            respect_robots: true,
            user_agent: default_user_agent(),
            delay: default_delay(),
            jitter: 0.0,
            page_timeout: default_page_timeout(),
            asset_timeout: default_asset_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for documents, assets and the index
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Write YAML front matter instead of a comment-and-heading preamble
    #[serde(default = "default_true")]
    pub frontmatter: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            frontmatter: true,
        }
    }
}

/// Checkpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    /// Override for the checkpoint document location
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Load the checkpoint at startup and continue from it
    #[serde(default)]
    pub resume: bool,

    /// Save a checkpoint every N written pages
    #[serde(rename = "save-every", default = "default_save_every")]
    pub save_every: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: None,
            resume: false,
            save_every: default_save_every(),
        }
    }
}

fn default_max_pages() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "web-crawling-bot/1.0".to_string()
}

fn default_delay() -> f64 {
    0.2
}

fn default_page_timeout() -> u64 {
    15
}

fn default_asset_timeout() -> u64 {
    20
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("site_markdown")
}

fn default_save_every() -> usize {
    10
}
