//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::storage::CheckpointState;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to read checkpoint {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write checkpoint {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed checkpoint {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Trait for checkpoint backends
///
/// A save fully replaces the previous snapshot; a load returns `None` when
/// no snapshot exists yet.
pub trait StateStore {
    /// Persists a snapshot, replacing any previous one
    fn save(&self, snapshot: &CheckpointState) -> CheckpointResult<()>;

    /// Loads the last saved snapshot
    fn load(&self) -> CheckpointResult<Option<CheckpointState>>;
}
