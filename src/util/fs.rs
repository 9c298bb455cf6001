//! Filesystem utilities.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Read-only view of a directory tree.
///
/// License scanning goes through this trait so it can run against an
/// in-memory tree in tests.
pub trait FileTree {
    /// Regular files under `root`, recursively, in a stable order.
    fn files(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf> + '_>;

    /// Read a file's bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskTree;

impl FileTree for DiskTree {
    fn files(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf> + '_> {
        let walker = WalkDir::new(root).sort_by_file_name().into_iter();

        Box::new(walker.filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("walk error: {}", e);
                None
            }
        }))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Replace `path` with `contents` atomically.
///
/// The bytes go to a temporary file next to the target which is then
/// renamed over it, so readers never observe a half-written file and a
/// failed write leaves the previous contents in place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = stage(path, contents)?;
    commit(tmp, path)
}

/// Replace several files as one unit.
///
/// Every file is staged next to its target before any target is touched.
/// If a later rename fails, targets already replaced get their previous
/// contents back, or are removed if they did not exist before.
pub fn write_atomic_all(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        staged.push((*path, stage(path, contents)?));
    }

    let mut committed: Vec<(&Path, Option<Vec<u8>>)> = Vec::new();
    for (path, tmp) in staged {
        let previous = fs::read(path).ok();
        if let Err(e) = commit(tmp, path) {
            restore(&committed);
            return Err(e);
        }
        committed.push((path, previous));
    }

    Ok(())
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to flush file: {}", path.display()))?;

    Ok(tmp)
}

fn commit(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(())
}

fn restore(committed: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in committed.iter().rev() {
        let result = match previous {
            Some(bytes) => stage(path, bytes).and_then(|tmp| commit(tmp, path)),
            None => fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display())),
        };
        if let Err(e) = result {
            tracing::warn!("could not roll back {}: {:#}", path.display(), e);
        }
    }
}
