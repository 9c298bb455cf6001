//! Test utilities and mocks for carimbo-deps unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use carimbo_deps::test_support::{MockFileSystem, InstalledFixture};
//!
//! #[test]
//! fn test_example() {
//!     let mut fs = MockFileSystem::new();
//!     fs.add_file("/deps/ogg/COPYING", "BSD-3-Clause");
//!
//!     let fixture = InstalledFixture::for_platform("linux");
//!     // Use fixtures in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::fs::FileTree;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock filesystem for testing without real I/O.
///
/// Provides an in-memory file tree that can be used to test code that
/// reads directory trees without touching the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    unreadable: Vec<PathBuf>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Add a file that is listed but fails to read.
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_file(&path, Vec::new());
        self.unreadable.push(path);
    }
}

impl FileTree for MockFileSystem {
    fn files(&self, root: &Path) -> Box<dyn Iterator<Item = PathBuf> + '_> {
        let mut files: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect();
        files.sort();
        Box::new(files.into_iter())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.unreadable.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }

        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_files_sorted_under_root() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/b/LICENSE", "b");
        fs.add_file("/deps/a/COPYING", "a");
        fs.add_file("/other/LICENSE", "x");

        let files: Vec<_> = fs.files(Path::new("/deps")).collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/deps/a/COPYING"),
                PathBuf::from("/deps/b/LICENSE")
            ]
        );
    }

    #[test]
    fn test_mock_fs_read() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/a.txt", "hello");

        assert_eq!(FileTree::read(&fs, Path::new("/a.txt")).unwrap(), b"hello");
        let err = FileTree::read(&fs, Path::new("/b.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_unreadable() {
        let mut fs = MockFileSystem::new();
        fs.add_unreadable("/deps/x/LICENSE");

        assert_eq!(fs.files(Path::new("/deps/x")).count(), 1);
        let err = FileTree::read(&fs, Path::new("/deps/x/LICENSE")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
