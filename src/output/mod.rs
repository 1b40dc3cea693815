//! Output module for the Markdown mirror
//!
//! This module handles:
//! - Writing one Markdown document per crawled page
//! - Writing the `index.md` table of every written page

mod document;
mod index;
mod traits;

pub use document::{format_page_document, write_page_document, PageDocument};
pub use index::{format_index, write_index, INDEX_FILE};
pub use traits::{OutputError, OutputResult};

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `contents` to `relative` under `output_dir`, creating parent directories
pub(crate) fn write_file(output_dir: &Path, relative: &str, contents: &str) -> OutputResult<PathBuf> {
    let path = output_dir.join(relative);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| OutputError::write(parent, e))?;
    }
    fs::write(&path, contents).map_err(|e| OutputError::write(&path, e))?;

    Ok(path)
}
