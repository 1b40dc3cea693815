//! site2md main entry point
//!
//! This is the command-line interface for the site2md website mirror.

use anyhow::Context;
use clap::Parser;
use site2md::config::{read_config, validate, Config};
use site2md::crawler::run_crawl;
use site2md::StopReason;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// site2md: mirror a website as Markdown
///
/// site2md crawls every page on the start URL's host, breadth-first, and
/// writes each one as a Markdown document. Images and linked documents are
/// downloaded next to the pages. Progress is checkpointed so an interrupted
/// crawl can be resumed with --resume.
#[derive(Parser, Debug)]
#[command(name = "site2md")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a website and save its pages as Markdown", long_about = None)]
struct Cli {
    /// Start URL (overrides crawler.start-url from the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the Markdown mirror is written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum number of URLs to visit
    #[arg(short, long, value_name = "N")]
    max_pages: Option<usize>,

    /// Obey robots.txt (default)
    #[arg(long, conflicts_with = "no_respect_robots")]
    respect_robots: bool,

    /// Ignore robots.txt
    #[arg(long)]
    no_respect_robots: bool,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Seconds to wait between requests
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Random +/- seconds added to each delay
    #[arg(long, value_name = "SECONDS")]
    jitter: Option<f64>,

    /// Checkpoint file (default: <output-dir>/.crawl_state.json)
    #[arg(long, value_name = "FILE")]
    checkpoint_file: Option<PathBuf>,

    /// Resume from the checkpoint file if it exists
    #[arg(long)]
    resume: bool,

    /// Save a checkpoint every N written pages
    #[arg(long, value_name = "N")]
    save_every: Option<usize>,

    /// Write a plain source comment instead of YAML front matter
    #[arg(long)]
    no_frontmatter: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a base configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.crawler.start_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if self.respect_robots {
            config.crawler.respect_robots = true;
        }
        if self.no_respect_robots {
            config.crawler.respect_robots = false;
        }
        if let Some(user_agent) = &self.user_agent {
            config.crawler.user_agent = user_agent.clone();
        }
        if let Some(delay) = self.delay {
            config.crawler.delay = delay;
        }
        if let Some(jitter) = self.jitter {
            config.crawler.jitter = jitter;
        }
        if let Some(path) = &self.checkpoint_file {
            config.checkpoint.path = Some(path.clone());
        }
        if self.resume {
            config.checkpoint.resume = true;
        }
        if let Some(save_every) = self.save_every {
            config.checkpoint.save_every = save_every;
        }
        if self.no_frontmatter {
            config.output.frontmatter = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let base = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    let config = cli.apply(base);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let report = run_crawl(config).await.context("crawl failed")?;

    match report.stop_reason {
        StopReason::Interrupted => tracing::warn!(
            "Crawl interrupted with {} URLs pending; rerun with --resume to continue",
            report.pending
        ),
        StopReason::PageBudget if report.pending > 0 => tracing::info!(
            "Page budget reached with {} URLs pending",
            report.pending
        ),
        _ => {}
    }
    tracing::info!(
        "Crawled {} URLs, wrote {} pages",
        report.visited,
        report.pages_written
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site2md=info,warn"),
            1 => EnvFilter::new("site2md=debug,info"),
            2 => EnvFilter::new("site2md=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config) {
    println!("=== site2md Dry Run ===\n");

    println!("Crawler:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Delay: {}s (jitter {}s)",
        config.crawler.delay, config.crawler.jitter
    );
    println!(
        "  Timeouts: page {}s, asset {}s",
        config.crawler.page_timeout, config.crawler.asset_timeout
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output_dir().display());
    println!("  Front matter: {}", config.output.frontmatter);

    println!("\nCheckpoint:");
    println!("  File: {}", config.checkpoint_path().display());
    println!("  Resume: {}", config.checkpoint.resume);
    println!("  Save every: {} pages", config.checkpoint.save_every);

    println!("\n✓ Configuration is valid");
}
