use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const MARKER_SUFFIX: &str = ".id";

/// Sidecar marker location for a destination: `<destination>.id`
pub fn marker_path(destination: &Path) -> PathBuf {
    let mut raw: OsString = destination.as_os_str().to_owned();
    raw.push(MARKER_SUFFIX);
    PathBuf::from(raw)
}

/// True when both the destination and its marker exist and the marker holds
/// exactly `identifier`. Any missing or unreadable file counts as stale.
pub async fn is_up_to_date(destination: &Path, identifier: &str) -> bool {
    if !is_file(destination).await {
        return false;
    }

    let marker = marker_path(destination);
    match tokio::fs::read(&marker).await {
        Ok(stored) => stored == identifier.as_bytes(),
        Err(e) => {
            debug!(path = %marker.display(), error = %e, "Marker unreadable");
            false
        }
    }
}

/// Record `identifier` as the content now on disk. Must only run after the
/// destination itself has been written.
pub async fn commit(destination: &Path, identifier: &str) -> io::Result<()> {
    let marker = marker_path(destination);
    tokio::fs::write(&marker, identifier.as_bytes()).await?;
    debug!(path = %marker.display(), identifier, "Marker committed");
    Ok(())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
