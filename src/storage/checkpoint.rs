//! JSON checkpoint document
//!
//! ```json
//! {
//!   "to_visit": ["https://example.com/about"],
//!   "visited": ["https://example.com/"],
//!   "discovered_titles": {"https://example.com/": "Home"},
//!   "last_saved": "2024-01-01T00:00:00.000000Z"
//! }
//! ```

use crate::state::CrawlState;
use crate::storage::traits::{CheckpointError, CheckpointResult, StateStore};
use crate::url::{is_same_origin, normalize_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Durable snapshot of crawl progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState {
    /// Pending URLs in frontier order
    #[serde(default)]
    pub to_visit: Vec<String>,

    /// Visited URLs, sorted
    #[serde(default)]
    pub visited: Vec<String>,

    /// URL to page title
    #[serde(default)]
    pub discovered_titles: BTreeMap<String, String>,

    /// When this snapshot was taken
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl CheckpointState {
    /// Captures the current crawl state, stamped with the current time
    pub fn capture(state: &CrawlState) -> Self {
        Self {
            to_visit: state.pending().map(str::to_string).collect(),
            visited: state.visited_sorted(),
            discovered_titles: state.titles().clone(),
            last_saved: Some(Utc::now()),
        }
    }

    /// Merges this snapshot into a live crawl state
    ///
    /// Every saved URL is canonicalized again before it is merged. Entries
    /// that no longer parse, or that belong to another origin than `seed`,
    /// are dropped with a warning.
    pub fn restore_into(self, seed: &Url, state: &mut CrawlState) {
        let keep = |raw: &str| match normalize_url(raw) {
            Ok(url) if is_same_origin(seed, &url) => Some(url.to_string()),
            Ok(_) => {
                tracing::warn!("Dropping checkpoint entry {} (outside {})", raw, seed);
                None
            }
            Err(e) => {
                tracing::warn!("Dropping checkpoint entry {:?}: {}", raw, e);
                None
            }
        };

        let pending: Vec<String> = self
            .to_visit
            .iter()
            .filter_map(|u| keep(u.as_str()))
            .collect();
        let visited: Vec<String> = self
            .visited
            .iter()
            .filter_map(|u| keep(u.as_str()))
            .collect();
        let titles: BTreeMap<String, String> = self
            .discovered_titles
            .into_iter()
            .filter_map(|(u, title)| keep(u.as_str()).map(|u| (u, title)))
            .collect();

        state.merge(pending, visited, titles);
    }
}

/// Checkpoint store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the snapshot is written to before being renamed into place
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonCheckpointStore {
    fn save(&self, snapshot: &CheckpointState) -> CheckpointResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let write_err = |source| CheckpointError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(write_err)?;
        fs::rename(&temp, &self.path).map_err(write_err)?;

        Ok(())
    }

    fn load(&self) -> CheckpointResult<Option<CheckpointState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CheckpointError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let snapshot =
            serde_json::from_str(&content).map_err(|source| CheckpointError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(snapshot))
    }
}
