//! HTML parser for extracting links, images and the page body
//!
//! This module handles parsing fetched HTML to extract:
//! - The page title
//! - Raw `<a href>` and `<img src>` references, in document order
//! - The serialized `<body>` subtree that gets rendered to Markdown
//!
//! References are returned exactly as written in the document. Resolving
//! and classifying them is the caller's job (see [`crate::url::classify_link`]).

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from the first `<title>` tag), trimmed
    pub title: Option<String>,

    /// Raw `href` values of every `<a>` element
    pub links: Vec<String>,

    /// Raw `src` values of every `<img>` element
    pub images: Vec<String>,

    /// Serialized body element, or the whole document when there is none
    pub body_html: String,
}

/// A single attribute value to substitute in serialized HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Attribute name, `href` or `src`
    pub attr: &'static str,
    /// Value as it appears in the source document
    pub original: String,
    /// Local path to put in its place
    pub replacement: String,
}

impl Rewrite {
    pub fn new(attr: &'static str, original: &str, replacement: &str) -> Self {
        Self {
            attr,
            original: original.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Parses HTML content and extracts title, references and body
///
/// # Example
///
/// ```no_run
/// use site2md::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: collect_attribute(&document, "a[href]", "href"),
        images: collect_attribute(&document, "img[src]", "src"),
        body_html: extract_body(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn collect_attribute(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::to_string)
        .collect()
}

fn extract_body(document: &Html) -> String {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(|body| body.html()))
        .unwrap_or_else(|| document.root_element().html())
}

/// Substitutes attribute values in serialized HTML
///
/// Matching is done against the serialized form of the attribute
/// (` src="..."` with `&` and `"` escaped), so only whole attribute names are
/// touched: never text content, never `data-src` and friends.
pub fn rewrite_references(html: &str, rewrites: &[Rewrite]) -> String {
    let mut rewritten = html.to_string();

    for rewrite in rewrites {
        // html5ever puts exactly one space before each attribute
        let needle = format!(" {}=\"{}\"", rewrite.attr, escape_attribute(&rewrite.original));
        let replacement = format!(
            " {}=\"{}\"",
            rewrite.attr,
            escape_attribute(&rewrite.replacement)
        );
        rewritten = rewritten.replace(&needle, &replacement);
    }

    rewritten
}

/// Renders an HTML fragment as Markdown
pub fn render_markdown(html: &str) -> String {
    html2md::parse_html(html)
}

// Mirrors html5ever's attribute-mode escaping.
fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}
