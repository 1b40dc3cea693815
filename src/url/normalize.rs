use crate::UrlError;
use url::Url;

/// Canonicalizes an already-parsed URL into its identity form
///
/// # Canonicalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Empty path becomes `/` (the `url` crate guarantees this for http(s))
/// 3. Host is lowercased (also guaranteed by the `url` crate)
/// 4. Query string is kept verbatim and stays part of the identity
///
/// Applying this twice yields the same URL.
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    if canonical.path().is_empty() {
        canonical.set_path("/");
    }
    canonical
}

/// Parses and canonicalizes an absolute URL string
///
/// Used for the seed URL and for URLs restored from a checkpoint.
///
/// # Examples
///
/// ```
/// use site2md::url::normalize_url;
///
/// let url = normalize_url("https://Example.com#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_fetchable(&url)?;
    Ok(canonicalize(&url))
}

/// Resolves a (possibly relative) reference against the page it was found on
///
/// Protocol-relative references (`//host/path`) inherit the scheme of the
/// referring page.
pub fn resolve(base: &Url, reference: &str) -> Result<Url, UrlError> {
    let url = base
        .join(reference.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    check_fetchable(&url)?;
    Ok(canonicalize(&url))
}

fn check_fetchable(url: &Url) -> Result<(), UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(())
}
