//! Crawl coordinator - the page pipeline
//!
//! The coordinator drains the frontier one URL at a time:
//!
//! 1. Stop if interrupted, if the page budget is spent, or if the frontier is empty
//! 2. Dequeue the next URL (marking it visited in the same step)
//! 3. Check robots.txt, fetch, localize assets, render and write the document
//! 4. Feed same-origin, robots-allowed page links back into the frontier
//! 5. Checkpoint every N written pages
//!
//! After the loop a final checkpoint and the site index are always written.

use crate::config::{validate, Config};
use crate::crawler::assets::AssetResolver;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::{parse_html, render_markdown, rewrite_references, ParsedPage, Rewrite};
use crate::crawler::shutdown::ShutdownController;
use crate::crawler::throttle::Throttle;
use crate::output::{write_index, write_page_document, PageDocument};
use crate::robots::RobotsGate;
use crate::state::{CrawlState, PageState};
use crate::storage::{CheckpointState, JsonCheckpointStore, StateStore};
use crate::url::{classify_link, is_same_origin, normalize_url, page_path, LinkKind, ASSETS_DIR};
use crate::{ConfigError, CrawlError};
use chrono::Utc;
use reqwest::Client;
use std::fmt;
use std::fs;
use std::time::Instant;
use url::Url;

/// How often (in processed URLs) a progress line is logged
const PROGRESS_INTERVAL: usize = 10;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No URLs left to visit
    FrontierExhausted,
    /// The visited set reached `max-pages`
    PageBudget,
    /// An interrupt asked the crawl to stop
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::PageBudget => "page budget reached",
            Self::Interrupted => "interrupted",
        };
        f.write_str(reason)
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Size of the visited set, including URLs restored from a checkpoint
    pub visited: usize,
    /// Documents written during this run
    pub pages_written: usize,
    /// URLs still in the frontier
    pub pending: usize,
    pub stop_reason: StopReason,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    seed: Url,
    client: Client,
    robots: RobotsGate,
    throttle: Throttle,
    assets: AssetResolver,
    store: JsonCheckpointStore,
    state: CrawlState,
    shutdown: ShutdownController,
    pages_written: usize,
}

impl Coordinator {
    /// Creates a coordinator ready to run
    ///
    /// Validates the configuration, prepares the output directory, loads
    /// robots.txt for the seed's origin and, when resuming, merges the saved
    /// checkpoint. Only configuration problems are returned as errors; an
    /// unreadable checkpoint is logged and the crawl starts from the seed.
    pub async fn new(config: Config, shutdown: ShutdownController) -> Result<Self, CrawlError> {
        validate(&config)?;

        let seed = normalize_url(&config.crawler.start_url)
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        let output_dir = config.output_dir().to_path_buf();
        fs::create_dir_all(output_dir.join(ASSETS_DIR)).map_err(|source| {
            ConfigError::OutputDir {
                path: output_dir.clone(),
                source,
            }
        })?;

        let client = build_http_client(&config.crawler.user_agent)?;

        let robots = if config.crawler.respect_robots {
            RobotsGate::fetch(
                &client,
                &seed,
                &config.crawler.user_agent,
                config.crawler.page_timeout(),
            )
            .await
        } else {
            tracing::info!("robots.txt compliance disabled");
            RobotsGate::disabled(&config.crawler.user_agent)
        };

        let throttle = Throttle::new(config.crawler.delay, config.crawler.jitter)
            .with_floor(robots.crawl_delay());
        if let Some(crawl_delay) = robots.crawl_delay() {
            tracing::info!(
                "robots.txt requests a crawl delay of {:?}, using {:?}",
                crawl_delay,
                throttle.base()
            );
        }

        let assets = AssetResolver::new(
            client.clone(),
            &output_dir,
            config.crawler.asset_timeout(),
        );

        let store = JsonCheckpointStore::new(config.checkpoint_path());
        let mut state = CrawlState::seeded(&seed);

        if config.checkpoint.resume {
            match store.load() {
                Ok(Some(snapshot)) => {
                    tracing::info!(
                        "Resuming from {}: {} visited, {} pending",
                        store.path().display(),
                        snapshot.visited.len(),
                        snapshot.to_visit.len()
                    );
                    snapshot.restore_into(&seed, &mut state);
                }
                Ok(None) => {
                    tracing::info!(
                        "No checkpoint at {}, starting from the seed",
                        store.path().display()
                    );
                }
                Err(e) => {
                    tracing::warn!("Ignoring checkpoint: {}", e);
                }
            }
        }

        Ok(Self {
            config,
            seed,
            client,
            robots,
            throttle,
            assets,
            store,
            state,
            shutdown,
            pages_written: 0,
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl loop until the frontier is empty, the page budget is
    /// spent, or an interrupt is observed
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlError> {
        tracing::info!(
            "Starting crawl of {} (max {} pages)",
            self.seed,
            self.config.crawler.max_pages
        );

        let start_time = Instant::now();
        let mut processed = 0usize;

        let stop_reason = loop {
            if self.shutdown.is_requested() {
                break StopReason::Interrupted;
            }
            if self.state.visited_count() >= self.config.crawler.max_pages {
                break StopReason::PageBudget;
            }
            let Some(url) = self.state.dequeue() else {
                break StopReason::FrontierExhausted;
            };

            match self.process_url(&url).await {
                Ok(outcome) if outcome.is_success() => {
                    self.pages_written += 1;
                    if self.pages_written % self.config.checkpoint.save_every == 0 {
                        self.save_checkpoint();
                    }
                }
                Ok(outcome) => {
                    debug_assert!(outcome.is_terminal());
                    tracing::debug!("{} finished as {}", url, outcome);
                }
                Err(e) => {
                    tracing::error!("Error processing {}: {}", url, e);
                }
            }

            processed += 1;

            if processed % PROGRESS_INTERVAL == 0 {
                let rate = processed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} visited, {} written, {} in frontier, {:.2} pages/sec",
                    self.state.visited_count(),
                    self.pages_written,
                    self.state.pending_count(),
                    rate
                );
            }
        };

        tracing::info!("Crawl loop stopped: {}", stop_reason);

        self.save_checkpoint();
        let index = write_index(
            self.config.output_dir(),
            self.seed.as_str(),
            self.state.titles(),
        )?;
        tracing::info!(
            "Wrote index of {} pages to {}",
            self.state.titles().len(),
            index.display()
        );

        let report = CrawlReport {
            visited: self.state.visited_count(),
            pages_written: self.pages_written,
            pending: self.state.pending_count(),
            stop_reason,
        };

        tracing::info!(
            "Crawl completed: {} visited, {} written in {:?}",
            report.visited,
            report.pages_written,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Runs one URL through the pipeline and returns its terminal state
    async fn process_url(&mut self, url_str: &str) -> Result<PageState, CrawlError> {
        let stage = advance(url_str, PageState::Queued, PageState::Fetching)?;

        let url = Url::parse(url_str)?;

        if !self.robots.can_fetch(&url) {
            tracing::info!("Skipping {} (disallowed by robots.txt)", url);
            return advance(url_str, stage, PageState::RobotsDenied);
        }

        tracing::info!("Fetching {}", url);
        let page = match fetch_page(&self.client, &url, self.config.crawler.page_timeout()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                self.throttle.wait().await;
                return advance(url_str, stage, PageState::FetchFailed);
            }
        };
        tracing::debug!("{} answered {}", url, page.status_code);
        if page.final_url != url.as_str() {
            tracing::debug!("{} redirected to {}", url, page.final_url);
        }
        if let Some(content_type) = page.content_type.as_deref() {
            if !content_type.contains("html") {
                tracing::debug!("{} is {}, rendering it as HTML anyway", url, content_type);
            }
        }

        let stage = advance(url_str, stage, PageState::Fetched)?;
        let stage = advance(url_str, stage, PageState::Rendering)?;

        let parsed = parse_html(&page.body);
        let title = parsed.title.clone().unwrap_or_else(|| url.to_string());
        let body = self.localize_assets(&url, &parsed).await;
        let markdown = render_markdown(&body);

        let document = PageDocument {
            title: &title,
            url: url.as_str(),
            crawled_at: Utc::now(),
            markdown: &markdown,
        };
        let relative = page_path(&url);

        let outcome = match write_page_document(
            self.config.output_dir(),
            &relative,
            &document,
            self.config.output.frontmatter,
        ) {
            Ok(path) => {
                tracing::debug!("Wrote {} -> {}", url, path.display());
                self.state.record_title(url_str, &title);
                self.discover_links(&url, &parsed.links);
                advance(url_str, stage, PageState::Written)?
            }
            Err(e) => {
                tracing::error!("Failed to write document for {}: {}", url, e);
                advance(url_str, stage, PageState::WriteFailed)?
            }
        };

        self.throttle.wait().await;
        Ok(outcome)
    }

    /// Downloads referenced assets and returns the body with local references
    async fn localize_assets(&mut self, page_url: &Url, parsed: &ParsedPage) -> String {
        let mut rewrites: Vec<Rewrite> = Vec::new();

        for src in &parsed.images {
            if let Some(local) = self.assets.resolve(page_url, src).await {
                push_unique(&mut rewrites, Rewrite::new("src", src, &local));
            }
        }

        for href in &parsed.links {
            if !matches!(classify_link(page_url, href), LinkKind::Asset(_)) {
                continue;
            }
            if let Some(local) = self.assets.resolve(page_url, href).await {
                push_unique(&mut rewrites, Rewrite::new("href", href, &local));
            }
        }

        rewrite_references(&parsed.body_html, &rewrites)
    }

    /// Enqueues same-origin, robots-allowed page links
    fn discover_links(&mut self, page_url: &Url, links: &[String]) {
        let mut added = 0usize;

        for href in links {
            let candidate = match classify_link(page_url, href) {
                LinkKind::Page(candidate) => candidate,
                kind => {
                    tracing::trace!("Not following {:?} ({:?})", href, kind);
                    continue;
                }
            };

            if !is_same_origin(&self.seed, &candidate) {
                tracing::trace!("Skipping cross-origin link {}", candidate);
                continue;
            }

            if !self.robots.can_fetch(&candidate) {
                tracing::debug!("Not enqueuing {} (disallowed by robots.txt)", candidate);
                continue;
            }

            if self.state.enqueue(&candidate) {
                added += 1;
            }
        }

        tracing::debug!("Discovered {} new links on {}", added, page_url);
    }

    /// Persists the current state; failures are logged, never fatal
    fn save_checkpoint(&self) {
        let snapshot = CheckpointState::capture(&self.state);
        match self.store.save(&snapshot) {
            Ok(()) => tracing::info!(
                "Saved checkpoint to {} ({} visited, {} pending)",
                self.store.path().display(),
                snapshot.visited.len(),
                snapshot.to_visit.len()
            ),
            Err(e) => tracing::warn!("Failed to save checkpoint: {}", e),
        }
    }
}

fn advance(url: &str, from: PageState, to: PageState) -> Result<PageState, CrawlError> {
    if !from.can_transition_to(to) {
        return Err(CrawlError::InvalidTransition { from, to });
    }
    tracing::trace!("{}: {} -> {}", url, from, to);
    Ok(to)
}

fn push_unique(rewrites: &mut Vec<Rewrite>, rewrite: Rewrite) {
    if !rewrites
        .iter()
        .any(|r| r.attr == rewrite.attr && r.original == rewrite.original)
    {
        rewrites.push(rewrite);
    }
}

/// Runs a complete crawl with Ctrl+C handling installed
///
/// # Example
///
/// ```no_run
/// use site2md::config::Config;
/// use site2md::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::for_url("https://example.com/")).await?;
/// println!("{} pages written", report.pages_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let shutdown = ShutdownController::new();
    let listener = shutdown.listen_for_ctrl_c();

    let mut coordinator = Coordinator::new(config, shutdown).await?;
    let report = coordinator.run().await;

    listener.abort();
    report
}
