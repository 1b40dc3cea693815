//! Site index generation
//!
//! `index.md` lists every written page as a Markdown table, sorted by URL.

use crate::output::{write_file, OutputResult};
use crate::url::page_path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

/// File name of the index, relative to the output directory
pub const INDEX_FILE: &str = "index.md";

/// Formats the index table for `titles` (URL to title)
pub fn format_index(start_url: &str, titles: &BTreeMap<String, String>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Crawled site index for {}\n\n", start_url));
    md.push_str("| Title | URL | File |\n");
    md.push_str("|---|---|---|\n");

    // BTreeMap iteration is already sorted by URL
    for (url, title) in titles {
        let file = Url::parse(url)
            .map(|parsed| page_path(&parsed))
            .unwrap_or_default();
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(title),
            escape_cell(url),
            escape_cell(&file)
        ));
    }

    md
}

/// Writes `index.md` under `output_dir`
pub fn write_index(
    output_dir: &Path,
    start_url: &str,
    titles: &BTreeMap<String, String>,
) -> OutputResult<PathBuf> {
    write_file(output_dir, INDEX_FILE, &format_index(start_url, titles))
}

fn escape_cell(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
