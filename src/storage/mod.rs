//! Local destination storage
//!
//! Every destination `P` is paired with a sidecar marker `P.id` holding the
//! identifier of the content on disk. The marker is a simple version tag,
//! not a content hash: nothing here verifies the bytes themselves.

pub mod marker;
pub mod paths;

pub use marker::{commit, is_up_to_date, marker_path};
pub use paths::ensure_parents;

use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Staging file `P.part` that content lands in before replacing `P`
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Write fetched content to its destination, creating parents as needed.
///
/// The bytes go to [`part_path`] first and are renamed over the destination,
/// so an interrupted write never leaves a truncated file at `destination`.
pub async fn write_content(destination: &Path, content: &Bytes) -> std::io::Result<()> {
    ensure_parents(destination).await?;

    let staging = part_path(destination);
    let staged = async {
        tokio::fs::write(&staging, content).await?;
        tokio::fs::rename(&staging, destination).await
    };
    if let Err(e) = staged.await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }

    tracing::debug!(path = %destination.display(), size = content.len(), "Content written");
    Ok(())
}
