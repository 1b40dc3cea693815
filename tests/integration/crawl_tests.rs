//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site2md::config::Config;
use site2md::crawler::{Coordinator, CrawlReport, ShutdownController};
use site2md::storage::{CheckpointState, JsonCheckpointStore, StateStore};
use site2md::url::network_location;
use site2md::StopReason;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration writing into `out` under the temp dir
fn create_test_config(seed: &str, dir: &TempDir) -> Config {
    let mut config = Config::for_url(seed);
    config.output.directory = dir.path().join("out");
    config.crawler.delay = 0.0;
    config.crawler.user_agent = "TestBot/1.0".to_string();
    config
}

async fn crawl(config: Config) -> CrawlReport {
    let mut coordinator = Coordinator::new(config, ShutdownController::new())
        .await
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, body))
        .mount(server)
        .await;
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.as_ref().display(), e))
}

#[tokio::test]
async fn test_full_crawl_single_origin() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);
    let netloc = network_location(&Url::parse(&seed).unwrap());

    mount_page(
        &server,
        "/",
        "Home",
        r#"<h2>Welcome</h2>
           <a href="/about">About</a>
           <a href="https://other.com/x">Elsewhere</a>
           <a href="/style.css">Styles</a>
           <a href="mailto:team@example.com">Mail</a>
           <img src="/logo.png" alt="Logo">"#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        "About us",
        r#"<p>We write things.</p><img src="/logo.png" alt="Logo"><a href="/">Home</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&seed, &dir)).await;
    let out = dir.path().join("out");

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.visited, 2);
    assert_eq!(report.pages_written, 2);
    assert_eq!(report.pending, 0);

    // Asset downloaded once and referenced locally
    let asset = format!("assets/{}/logo.png", netloc);
    assert_eq!(fs::read(out.join(&asset)).unwrap(), b"PNGDATA");

    let about = read(out.join("about.md"));
    assert!(about.starts_with("---\ntitle: \"About us\"\n"));
    assert!(about.contains(&format!("url: \"{}/about\"", base)));
    assert!(about.contains("We write things."));
    assert!(about.contains(&asset));

    // The index replaces the seed's own document at index.md
    let index = read(out.join("index.md"));
    assert!(index.starts_with(&format!("# Crawled site index for {}", seed)));
    let rows: Vec<&str> = index.lines().skip(4).collect();
    assert_eq!(
        rows,
        vec![
            format!("| Home | {} | index.md |", seed),
            format!("| About us | {}about | about.md |", seed),
        ]
    );

    // Final checkpoint holds exactly the visited set
    let checkpoint = JsonCheckpointStore::new(out.join(".crawl_state.json"))
        .load()
        .unwrap()
        .expect("checkpoint should exist");
    assert_eq!(checkpoint.visited, vec![seed.clone(), format!("{}about", seed)]);
    assert!(checkpoint.to_visit.is_empty());
    assert!(checkpoint.last_saved.is_some());
}

#[tokio::test]
async fn test_seed_not_found() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&seed, &dir)).await;
    let out = dir.path().join("out");

    assert_eq!(report.visited, 1);
    assert_eq!(report.pages_written, 0);
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);

    let index = read(out.join("index.md"));
    assert_eq!(index.lines().count(), 4);
    assert!(index.ends_with("|---|---|---|\n"));
}

#[tokio::test]
async fn test_robots_disallowed_links_are_not_fetched() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/private/report">Secret</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "Public", "<p>open</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/report"))
        .respond_with(html_page("Secret", "<p>hidden</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&seed, &dir)).await;

    assert_eq!(report.visited, 2);
    assert!(dir.path().join("out/public.md").exists());
    assert!(!dir.path().join("out/private/report.md").exists());
}

#[tokio::test]
async fn test_robots_disallowed_seed_is_visited_but_not_fetched() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: testbot\nDisallow: /\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", ""))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&seed, &dir)).await;

    assert_eq!(report.visited, 1);
    assert_eq!(report.pages_written, 0);
}

#[tokio::test]
async fn test_ignoring_robots_fetches_everything() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", "Home", "<p>hi</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&seed, &dir);
    config.crawler.respect_robots = false;
    let report = crawl(config).await;

    assert_eq!(report.pages_written, 1);
}

#[tokio::test]
async fn test_page_budget_then_resume() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/a", "A", r#"<a href="/c">C</a><a href="/">Home</a>"#).await;
    mount_page(&server, "/b", "B", "<p>b</p>").await;
    mount_page(&server, "/c", "C", "<p>c</p>").await;

    let dir = TempDir::new().unwrap();

    // First run stops at the budget with work left over
    let mut config = create_test_config(&seed, &dir);
    config.crawler.max_pages = 2;
    let first = crawl(config).await;

    assert_eq!(first.stop_reason, StopReason::PageBudget);
    assert_eq!(first.visited, 2);
    assert_eq!(first.pending, 2);

    let saved = JsonCheckpointStore::new(dir.path().join("out/.crawl_state.json"))
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(
        saved.to_visit,
        vec![format!("{}b", seed), format!("{}c", seed)]
    );

    // Resumed run picks up the frontier without refetching the seed
    let mut config = create_test_config(&seed, &dir);
    config.crawler.max_pages = 10;
    config.checkpoint.resume = true;
    let second = crawl(config).await;

    assert_eq!(second.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(second.visited, 4);
    assert_eq!(second.pages_written, 2);

    let index = read(dir.path().join("out/index.md"));
    for page in ["a.md", "b.md", "c.md", "index.md"] {
        assert!(index.contains(page), "index is missing {}", page);
    }
    assert!(index.contains("| Home |"));
}

#[tokio::test]
async fn test_plain_header_without_frontmatter() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", "Home", r#"<a href="/docs/guide/">Guide</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/docs/guide/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>No title here</p></body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&seed, &dir);
    config.output.frontmatter = false;
    crawl(config).await;

    let guide = read(dir.path().join("out/docs/guide/index.md"));
    let guide_url = format!("{}docs/guide/", seed);
    assert!(guide.starts_with(&format!(
        "<!-- Source: {} -->\n\n# {}\n\n",
        guide_url, guide_url
    )));
    assert!(guide.contains("No title here"));
}

#[tokio::test]
async fn test_resume_with_corrupt_checkpoint_starts_fresh() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    mount_page(&server, "/", "Home", "<p>hi</p>").await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join(".crawl_state.json"), "{ definitely not json").unwrap();

    let mut config = create_test_config(&seed, &dir);
    config.checkpoint.resume = true;
    let report = crawl(config).await;

    assert_eq!(report.pages_written, 1);
    let saved = JsonCheckpointStore::new(out.join(".crawl_state.json"))
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(saved.visited, vec![seed]);
}

/// Serves a page and records what the checkpoint file held at request time
struct CheckpointSnapshot {
    checkpoint: PathBuf,
    seen: Arc<Mutex<Option<String>>>,
    page: ResponseTemplate,
}

impl Respond for CheckpointSnapshot {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        *self.seen.lock().unwrap() = fs::read_to_string(&self.checkpoint).ok();
        self.page.clone()
    }
}

#[tokio::test]
async fn test_checkpoint_is_saved_while_crawling() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("out/.crawl_state.json");
    let seen = Arc::new(Mutex::new(None));

    mount_page(&server, "/", "Home", r#"<a href="/about">About</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(CheckpointSnapshot {
            checkpoint: checkpoint.clone(),
            seen: Arc::clone(&seen),
            page: html_page("About", "<p>about</p>"),
        })
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&seed, &dir);
    config.checkpoint.save_every = 1;
    let report = crawl(config).await;
    assert_eq!(report.pages_written, 2);

    // Saved after the seed was written, before /about was fetched
    let mid_run = seen.lock().unwrap().take().expect("no checkpoint during the crawl");
    let mid_run: CheckpointState = serde_json::from_str(&mid_run).unwrap();
    assert_eq!(mid_run.visited, vec![seed.clone()]);
    assert_eq!(mid_run.to_visit, vec![format!("{}about", seed)]);
    assert_eq!(mid_run.discovered_titles.get(&seed).map(String::as_str), Some("Home"));
}

#[tokio::test]
async fn test_no_checkpoint_before_save_interval() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("out/.crawl_state.json");
    let seen = Arc::new(Mutex::new(None));

    mount_page(&server, "/", "Home", r#"<a href="/about">About</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(CheckpointSnapshot {
            checkpoint: checkpoint.clone(),
            seen: Arc::clone(&seen),
            page: html_page("About", "<p>about</p>"),
        })
        .mount(&server)
        .await;

    let mut config = create_test_config(&seed, &dir);
    config.checkpoint.save_every = 5;
    crawl(config).await;

    assert!(seen.lock().unwrap().is_none());
    assert!(checkpoint.exists());
}

#[tokio::test]
async fn test_write_failure_skips_page_and_continues() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/about">About</a><a href="/contact">Contact</a>"#,
    )
    .await;
    mount_page(&server, "/about", "About", r#"<a href="/team">Team</a>"#).await;
    mount_page(&server, "/contact", "Contact", "<p>write to us</p>").await;
    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(html_page("Team", ""))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    // A directory where about.md should go makes that write fail
    fs::create_dir_all(out.join("about.md")).unwrap();

    let report = crawl(create_test_config(&seed, &dir)).await;

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.visited, 3);
    assert_eq!(report.pages_written, 2);
    assert!(read(out.join("contact.md")).contains("write to us"));

    let index = read(out.join("index.md"));
    assert!(index.contains("| Contact |"));
    assert!(!index.contains("| About |"));

    let saved = JsonCheckpointStore::new(out.join(".crawl_state.json"))
        .load()
        .unwrap()
        .unwrap();
    assert!(saved.visited.contains(&format!("{}about", seed)));
    assert!(!saved.discovered_titles.contains_key(&format!("{}about", seed)));
}

#[tokio::test]
async fn test_failed_asset_keeps_original_reference() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", "Home", r#"<a href="/gallery">Gallery</a>"#).await;
    mount_page(
        &server,
        "/gallery",
        "Gallery",
        r#"<p>Pictures</p><img src="/logo.png" alt="Logo">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&seed, &dir)).await;
    let out = dir.path().join("out");

    assert_eq!(report.pages_written, 2);
    let gallery = read(out.join("gallery.md"));
    assert!(gallery.contains("Pictures"));
    assert!(gallery.contains("](/logo.png)"));
    assert!(!gallery.contains("assets/"));
    let netloc = network_location(&Url::parse(&seed).unwrap());
    assert!(!out.join("assets").join(netloc).join("logo.png").exists());
}

#[tokio::test]
async fn test_resume_drops_foreign_and_canonicalizes_saved_urls() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", ""))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/next", "Next", "<p>next</p>").await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let store = JsonCheckpointStore::new(out.join(".crawl_state.json"));
    store
        .save(&CheckpointState {
            to_visit: vec!["https://other.com/x".to_string(), format!("{}/next#top", base)],
            visited: vec![base.clone()],
            discovered_titles: Default::default(),
            last_saved: None,
        })
        .unwrap();

    // Seed given without its trailing slash
    let mut config = create_test_config(&base, &dir);
    config.checkpoint.resume = true;
    let report = crawl(config).await;

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.visited, 2);
    assert_eq!(report.pages_written, 1);

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.visited, vec![seed.clone(), format!("{}next", seed)]);
    assert!(saved.to_visit.is_empty());
    assert!(!read(out.join("index.md")).contains("other.com"));
}
