//! URL handling module
//!
//! This module provides URL canonicalization, link classification, crawl
//! scope checks, and the mapping of URLs onto local file paths.

mod classify;
mod normalize;
mod paths;

use ::url::Url;

// Re-export main functions
pub use classify::{classify_link, path_extension, LinkKind};
pub use normalize::{canonicalize, normalize_url, resolve};
pub use paths::{asset_path, network_location, page_path, ASSETS_DIR, MAX_COMPONENT_LEN};

/// Returns true if `candidate` lives on the same network location as `seed`
///
/// The comparison is host plus explicit port; the scheme is not part of it,
/// so `http://example.com/x` is in scope for an `https://example.com/` seed.
///
/// # Examples
///
/// ```
/// use site2md::url::is_same_origin;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// assert!(is_same_origin(&seed, &Url::parse("https://example.com/about").unwrap()));
/// assert!(!is_same_origin(&seed, &Url::parse("https://other.com/x").unwrap()));
/// assert!(!is_same_origin(&seed, &Url::parse("https://example.com:8443/").unwrap()));
/// ```
pub fn is_same_origin(seed: &Url, candidate: &Url) -> bool {
    network_location(seed) == network_location(candidate)
}
