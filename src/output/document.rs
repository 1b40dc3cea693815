//! Per-page Markdown documents
//!
//! With front matter enabled a document starts with a YAML block:
//!
//! ```text
//! ---
//! title: "About us"
//! url: "https://example.com/about"
//! crawled_at: "2024-01-01T00:00:00.000000Z"
//! ---
//!
//! <markdown>
//! ```
//!
//! Without it the source URL goes in an HTML comment followed by the title
//! as a level-one heading.

use crate::output::{write_file, OutputResult};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// A rendered page ready to be written
#[derive(Debug, Clone)]
pub struct PageDocument<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub crawled_at: DateTime<Utc>,
    pub markdown: &'a str,
}

/// Formats a page document
///
/// Front matter values are JSON-quoted, which is valid YAML and survives
/// titles containing colons, quotes or newlines.
pub fn format_page_document(doc: &PageDocument<'_>, frontmatter: bool) -> OutputResult<String> {
    let mut out = String::new();

    if frontmatter {
        let crawled_at = doc.crawled_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        out.push_str("---\n");
        out.push_str(&format!("title: {}\n", serde_json::to_string(doc.title)?));
        out.push_str(&format!("url: {}\n", serde_json::to_string(doc.url)?));
        out.push_str(&format!("crawled_at: {}\n", serde_json::to_string(&crawled_at)?));
        out.push_str("---\n\n");
    } else {
        out.push_str(&format!("<!-- Source: {} -->\n\n", doc.url));
        out.push_str(&format!("# {}\n\n", doc.title));
    }

    out.push_str(doc.markdown);
    Ok(out)
}

/// Writes a page document to `relative` under `output_dir`
///
/// Returns the full path of the written file.
pub fn write_page_document(
    output_dir: &Path,
    relative: &str,
    doc: &PageDocument<'_>,
    frontmatter: bool,
) -> OutputResult<PathBuf> {
    let contents = format_page_document(doc, frontmatter)?;
    write_file(output_dir, relative, &contents)
}
