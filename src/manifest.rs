//! Initial work list loading
//!
//! A manifest is a JSON array of items:
//!
//! ```json
//! [
//!   { "path": "css/site.css", "url": "https://cdn.example/site.css", "id": "3f2a9c" }
//! ]
//! ```
//!
//! `filename` is accepted in place of `path`.

use crate::queue::{ItemError, WorkItem};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest entry #{index} is invalid: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: ItemError,
    },
}

pub type Result<T> = std::result::Result<T, ManifestError>;

/// Read and validate a manifest file
pub async fn load(path: &Path) -> Result<Vec<WorkItem>> {
    let raw = tokio::fs::read(path).await.map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let items = parse(&raw)?;
    tracing::info!(path = %path.display(), items = items.len(), "Manifest loaded");
    Ok(items)
}

/// Parse and validate manifest JSON
pub fn parse(raw: &[u8]) -> Result<Vec<WorkItem>> {
    let items: Vec<WorkItem> = serde_json::from_slice(raw)?;

    for (index, item) in items.iter().enumerate() {
        item.validate()
            .map_err(|source| ManifestError::InvalidItem { index, source })?;
    }

    Ok(items)
}
