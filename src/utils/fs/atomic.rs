//! Atomic file write operations using temp-and-rename strategy.
//!
//! Generated modules are picked up by file watchers; writing through a
//! temporary file in the same directory means a watcher never observes a
//! half-written module.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::core::file_error::{FileOperation, FileResultExt};

/// Writes a UTF-8 string atomically. See [`atomic_write`].
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Writes `content` to `path` atomically.
///
/// Parent directories are created when missing. The content is written to a
/// temporary file next to `path`, synced, and renamed over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(parent).with_file_context(
        FileOperation::CreateDir,
        parent,
        "preparing output directory",
    )?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_file_context(FileOperation::Write, path, "replacing output file")?;

    Ok(())
}
