//! Mapping of URLs onto the output directory
//!
//! Both functions here are pure: the same URL always maps to the same
//! relative path, so nothing about assets or pages needs to be remembered
//! between runs. Returned paths always use `/` separators.

use sha2::{Digest, Sha256};
use url::Url;

/// Longest allowed final path component (filesystems cap names at 255 bytes)
pub const MAX_COMPONENT_LEN: usize = 200;

/// Number of hex digits of the URL hash appended to truncated names
const HASH_LEN: usize = 10;

/// Joins the path and a sanitized query string in generated names
const QUERY_SEPARATOR: &str = "__";

/// Directory (relative to the output root) that holds downloaded assets
pub const ASSETS_DIR: &str = "assets";

/// Derives the Markdown document path for a page
///
/// # Examples
///
/// ```
/// use site2md::url::page_path;
/// use url::Url;
///
/// let path = |s| page_path(&Url::parse(s).unwrap());
/// assert_eq!(path("https://example.com/"), "index.md");
/// assert_eq!(path("https://example.com/about"), "about.md");
/// assert_eq!(path("https://example.com/docs/"), "docs/index.md");
/// assert_eq!(path("https://example.com/?q=query"), "index__q_query.md");
/// ```
pub fn page_path(url: &Url) -> String {
    let mut path = url.path().to_string();
    if path.ends_with('/') {
        path.push_str("index");
    }

    let mut safe_path = path.trim_start_matches('/').to_string();
    if safe_path.is_empty() {
        safe_path = "index".to_string();
    }

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        safe_path = format!("{}{}{}", safe_path, QUERY_SEPARATOR, sanitize_query(query));
    }

    if !safe_path.ends_with(".md") {
        safe_path.push_str(".md");
    }

    cap_components(&safe_path, url, 16)
}

/// Derives the local path of a downloaded asset, rooted at `assets/<netloc>/`
///
/// # Examples
///
/// ```
/// use site2md::url::asset_path;
/// use url::Url;
///
/// let path = |s| asset_path(&Url::parse(s).unwrap());
/// assert_eq!(path("https://example.com/logo.png"), "assets/example.com/logo.png");
/// assert_eq!(path("https://cdn.example.com/img/photo"), "assets/cdn.example.com/img/photo.bin");
/// ```
pub fn asset_path(url: &Url) -> String {
    let mut path = url.path().trim_start_matches('/').to_string();
    if path.is_empty() {
        path = "root".to_string();
    } else if path.ends_with('/') {
        path.push_str("index");
    }

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        path = format!("{}{}{}", path, QUERY_SEPARATOR, sanitize_query(query));
    }

    let (_, last) = split_last_component(&path);
    if split_extension(last).1.is_empty() {
        path.push_str(".bin");
    }

    let path = cap_components(&path, url, 8);
    format!("{}/{}/{}", ASSETS_DIR, network_location(url), path)
}

/// Host plus explicit port, the unit of crawl scope
pub fn network_location(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Replaces every character outside `[0-9A-Za-z_-]` with `_`
fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Caps every over-long path component, suffixing it with a hash
///
/// The final component keeps its extension and is hashed with the full URL,
/// so distinct URLs never share a file. Directory components are hashed with
/// their own text, so sibling pages under a long directory stay together.
/// A file stem is never cut below `min_stem` characters.
fn cap_components(path: &str, source: &Url, min_stem: usize) -> String {
    let (dir, last) = split_last_component(path);

    let mut components: Vec<String> = dir
        .split('/')
        .filter(|c| !c.is_empty())
        .map(|c| {
            if c.chars().count() <= MAX_COMPONENT_LEN {
                c.to_string()
            } else {
                truncate_with_hash(c, "", &text_hash(c), 0)
            }
        })
        .collect();

    let last = if last.chars().count() <= MAX_COMPONENT_LEN {
        last.to_string()
    } else {
        let (stem, ext) = split_extension(last);
        truncate_with_hash(stem, ext, &text_hash(source.as_str()), min_stem)
    };
    components.push(last);

    components.join("/")
}

/// `<stem truncated>__<hash><ext>`, sized to fit `MAX_COMPONENT_LEN`
fn truncate_with_hash(stem: &str, ext: &str, hash: &str, min_stem: usize) -> String {
    let allowed = MAX_COMPONENT_LEN
        .saturating_sub(ext.chars().count() + QUERY_SEPARATOR.len() + hash.len())
        .max(min_stem);
    let truncated: String = stem.chars().take(allowed).collect();
    format!("{}{}{}{}", truncated, QUERY_SEPARATOR, hash, ext)
}

/// Splits `a/b/c.md` into (`a/b`, `c.md`)
fn split_last_component(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, last)) => (dir, last),
        None => ("", path),
    }
}

/// Splits a file name into stem and extension (including the dot)
///
/// Leading dots belong to the stem, so `.hidden` has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if !name[..idx].trim_start_matches('.').is_empty() => name.split_at(idx),
        _ => (name, ""),
    }
}

fn text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..HASH_LEN].to_string()
}
