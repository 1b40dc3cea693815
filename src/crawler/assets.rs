//! Asset localization
//!
//! Downloads images and linked documents referenced by crawled pages into
//! `<output>/assets/<host>/...` so the Markdown can point at local copies.
//! Assets are fetched once per run; later references reuse the stored path.

use crate::crawler::fetcher::fetch_bytes;
use crate::url::{asset_path, classify_link, LinkKind};
use reqwest::Client;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Resolves asset references to local files under the output directory
#[derive(Debug)]
pub struct AssetResolver {
    client: Client,
    output_dir: PathBuf,
    timeout: Duration,
    /// Absolute asset URL to stored relative path, `None` when the download failed
    resolved: HashMap<String, Option<String>>,
}

impl AssetResolver {
    pub fn new(client: Client, output_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            timeout,
            resolved: HashMap::new(),
        }
    }

    /// Downloads the asset behind `reference` and returns its path relative
    /// to the output directory
    ///
    /// Returns `None` for data URIs, unresolvable references, and any
    /// download or write failure. Failures are logged and never propagated.
    pub async fn resolve(&mut self, page_url: &Url, reference: &str) -> Option<String> {
        let url = match classify_link(page_url, reference) {
            LinkKind::Page(url) | LinkKind::Asset(url) => url,
            LinkKind::Ignored | LinkKind::Invalid => {
                tracing::trace!("Not localizing reference {:?} on {}", reference, page_url);
                return None;
            }
        };

        if let Some(cached) = self.resolved.get(url.as_str()) {
            return cached.clone();
        }

        let stored = self.download(&url).await;
        self.resolved.insert(url.to_string(), stored.clone());
        stored
    }

    async fn download(&self, url: &Url) -> Option<String> {
        let bytes = match fetch_bytes(&self.client, url, self.timeout).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to download asset {}: {}", url, e);
                return None;
            }
        };

        let relative = asset_path(url);
        let destination = self.output_dir.join(&relative);

        if let Err(e) = store(&destination, &bytes) {
            tracing::warn!("Failed to save asset {} to {}: {}", url, destination.display(), e);
            return None;
        }

        tracing::debug!("Saved asset {} ({} bytes) -> {}", url, bytes.len(), relative);
        Some(relative)
    }
}

fn store(destination: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, bytes)
}
