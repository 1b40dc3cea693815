use crate::url::normalize::resolve;
use url::Url;

/// Extensions that are never crawled or downloaded
const IGNORED_EXTENSIONS: &[&str] = &[
    "css", "js", "json", "zip", "rar", "exe", "tar", "gz", "mp3", "mp4", "avi", "mov",
];

/// Extensions downloaded as assets instead of being crawled as pages
const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "pdf", "doc", "docx", "xls", "xlsx", "ppt",
    "pptx",
];

/// What a reference found on a page points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// A document to crawl, already canonicalized
    Page(Url),
    /// A binary resource to download, already canonicalized
    Asset(Url),
    /// A resolvable URL with an extension we skip (stylesheets, scripts, archives, media)
    Ignored,
    /// Not a fetchable reference (fragment-only, javascript:, mailto:, tel:, data:, unparsable)
    Invalid,
}

/// Classifies a raw `href`/`src` value found on `base`
///
/// # Examples
///
/// ```
/// use site2md::url::{classify_link, LinkKind};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(matches!(classify_link(&base, "/about"), LinkKind::Page(_)));
/// assert!(matches!(classify_link(&base, "/logo.png"), LinkKind::Asset(_)));
/// assert_eq!(classify_link(&base, "/site.css"), LinkKind::Ignored);
/// assert_eq!(classify_link(&base, "#top"), LinkKind::Invalid);
/// ```
pub fn classify_link(base: &Url, reference: &str) -> LinkKind {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return LinkKind::Invalid;
    }

    let lower = reference.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return LinkKind::Invalid;
    }

    let url = match resolve(base, reference) {
        Ok(url) => url,
        Err(_) => return LinkKind::Invalid,
    };

    match path_extension(url.path()) {
        Some(ext) if IGNORED_EXTENSIONS.contains(&ext.as_str()) => LinkKind::Ignored,
        Some(ext) if ASSET_EXTENSIONS.contains(&ext.as_str()) => LinkKind::Asset(url),
        _ => LinkKind::Page(url),
    }
}

/// Returns the lowercased extension of the last path segment, if any
///
/// A leading dot (`/.well-known`) does not start an extension.
pub fn path_extension(path: &str) -> Option<String> {
    let last = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.trim_start_matches('.').is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
