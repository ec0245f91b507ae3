use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("source URL is empty for '{0}'")]
    EmptyUrl(String),

    #[error("destination path is empty")]
    EmptyPath,

    #[error("destination path '{0}' must be relative and stay under the destination root")]
    EscapesRoot(String),
}

/// One file to materialize: where it goes, where it comes from, and the
/// opaque identifier of the content expected on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(rename = "path", alias = "filename")]
    pub destination_path: PathBuf,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "id")]
    pub identifier: String,
}

impl WorkItem {
    pub fn new(
        destination_path: impl Into<PathBuf>,
        source_url: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            destination_path: destination_path.into(),
            source_url: source_url.into(),
            identifier: identifier.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ItemError> {
        if self.destination_path.as_os_str().is_empty() {
            return Err(ItemError::EmptyPath);
        }
        if self.source_url.trim().is_empty() {
            return Err(ItemError::EmptyUrl(
                self.destination_path.display().to_string(),
            ));
        }

        let escapes = self.destination_path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ItemError::EscapesRoot(
                self.destination_path.display().to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute destination under `root`
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.destination_path)
    }
}
