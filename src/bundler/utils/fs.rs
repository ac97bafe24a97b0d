//! File system utilities for packaging.

use crate::bundler::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Creates the given directory, erasing it first if it already exists.
pub async fn create_dir(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if fs::try_exists(path).await.fs_context("checking directory", path)? {
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)?;
    }
    Ok(())
}

/// Lists the regular files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !fs::try_exists(dir).await.fs_context("checking directory", dir)? {
        return Ok(Vec::new());
    }

    let mut entries = fs::read_dir(dir).await.fs_context("reading directory", dir)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.fs_context("reading directory", dir)? {
        let file_type = entry
            .file_type()
            .await
            .fs_context("reading file type", entry.path())?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Removes a file, ignoring a file that is already gone.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}
