//! Storage module for persisting crawl progress
//!
//! This module handles the checkpoint document that makes a crawl resumable:
//! - Capturing the frontier, visited set and title index as a snapshot
//! - Atomic full-overwrite saves
//! - Tolerant loads (a missing file is "no checkpoint", not an error)

mod checkpoint;
mod traits;

pub use checkpoint::{CheckpointState, JsonCheckpointStore};
pub use traits::{CheckpointError, CheckpointResult, StateStore};
