use std::io::{self, ErrorKind};
use std::path::Path;

/// Create every missing ancestor directory of `file_path`.
///
/// Ancestors are collected walking up from the immediate parent until an
/// existing directory is found, then created root-to-leaf one level at a
/// time. `AlreadyExists` from a concurrent creator is not an error.
pub async fn ensure_parents(file_path: &Path) -> io::Result<()> {
    let mut missing = Vec::new();
    let mut current = file_path.parent();

    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || tokio::fs::try_exists(dir).await? {
            break;
        }
        missing.push(dir);
        current = dir.parent();
    }

    for dir in missing.into_iter().rev() {
        match tokio::fs::create_dir(dir).await {
            Ok(()) => tracing::trace!(path = %dir.display(), "Directory created"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
