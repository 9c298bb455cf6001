//! License manifest aggregation.
//!
//! Walks each installed package folder, keeps files whose name starts with
//! `license`, `copying` or `copyright` (any case), and concatenates them into
//! one document of `name/version` headed blocks.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use glob::{MatchOptions, Pattern};

use crate::core::installed::InstalledPackage;
use crate::util::fs::{write_atomic, FileTree};

/// File name of the license manifest inside the output directory.
pub const LICENSES_FILE: &str = "licenses.txt";

/// File name prefixes that mark a license source.
pub const LICENSE_PATTERNS: &[&str] = &["license*", "copying*", "copyright*"];

static LICENSE_MATCHERS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    LICENSE_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
});

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Whether a file's name marks it as a license source.
pub fn is_license_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();

    LICENSE_MATCHERS
        .iter()
        .any(|pattern| pattern.matches_with(&name, MATCH_OPTIONS))
}

/// One license text attributed to a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    /// `name/version`
    pub package_id: String,
    pub text: String,
}

impl LicenseRecord {
    /// Render as a manifest block.
    pub fn to_block(&self) -> String {
        format!("{}\n{}\n\n", self.package_id, self.text)
    }
}

/// Accumulates license blocks in the order packages are added.
pub struct LicenseAggregator<'a, T: FileTree> {
    tree: &'a T,
    buffer: String,
    contributors: Vec<String>,
}

impl<'a, T: FileTree> LicenseAggregator<'a, T> {
    pub fn new(tree: &'a T) -> Self {
        LicenseAggregator {
            tree,
            buffer: String::new(),
            contributors: Vec::new(),
        }
    }

    /// License files under `root`, lazily, in tree order.
    pub fn candidates<'b>(&'b self, root: &Path) -> impl Iterator<Item = PathBuf> + 'b {
        self.tree.files(root).filter(|path| is_license_file(path))
    }

    /// Read the license records of one package folder.
    ///
    /// Unreadable files are skipped; invalid UTF-8 is replaced.
    pub fn collect(&self, package_id: &str, root: &Path) -> Vec<LicenseRecord> {
        let mut records = Vec::new();

        for path in self.candidates(root) {
            let bytes = match self.tree.read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("skipping unreadable license file {}: {}", path.display(), e);
                    continue;
                }
            };

            let text = String::from_utf8_lossy(&bytes);
            let text = text.trim();
            if text.is_empty() {
                tracing::debug!("skipping empty license file {}", path.display());
                continue;
            }

            records.push(LicenseRecord {
                package_id: package_id.to_string(),
                text: text.to_string(),
            });
        }

        records
    }

    /// Append every license of an installed package. Build-only packages
    /// and packages without a folder are skipped. Returns the number of
    /// blocks written.
    pub fn add_package(&mut self, package: &InstalledPackage) -> usize {
        let Some(root) = package.license_root() else {
            tracing::debug!("no license folder for {}", package.reference());
            return 0;
        };

        let records = self.collect(&package.reference(), root);
        if records.is_empty() {
            tracing::debug!("no license files found for {}", package.reference());
            return 0;
        }

        let count = records.len();
        for record in &records {
            self.buffer.push_str(&record.to_block());
        }
        self.contributors.push(package.reference());
        count
    }

    /// Take the accumulated document.
    pub fn finish(self) -> LicenseDocument {
        LicenseDocument {
            text: self.buffer,
            contributors: self.contributors,
        }
    }
}

/// The aggregated license manifest, held in memory until written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseDocument {
    text: String,
    contributors: Vec<String>,
}

impl LicenseDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Packages that contributed at least one block, in document order.
    pub fn contributors(&self) -> &[String] {
        &self.contributors
    }

    /// Write to `output_dir`, replacing any previous manifest.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(LICENSES_FILE);
        write_atomic(&path, self.text.as_bytes())?;
        Ok(path)
    }
}

/// Aggregate licenses for packages in the given order.
pub fn aggregate<'p, T: FileTree>(
    tree: &T,
    packages: impl IntoIterator<Item = &'p InstalledPackage>,
) -> LicenseDocument {
    let mut aggregator = LicenseAggregator::new(tree);
    for package in packages {
        aggregator.add_package(package);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockFileSystem;
    use crate::util::fs::DiskTree;
    use tempfile::TempDir;

    #[test]
    fn test_license_name_predicate() {
        for name in [
            "LICENSE",
            "license.txt",
            "License.md",
            "COPYING",
            "COPYING.LIB",
            "copyright",
            "Copyright.txt",
            "LICENSE-MIT",
        ] {
            assert!(is_license_file(Path::new(name)), "{}", name);
        }

        for name in ["README", "mylicense.txt", "NOTICE", "lib.a", "LICENCE"] {
            assert!(!is_license_file(Path::new(name)), "{}", name);
        }

        assert!(is_license_file(Path::new("share/doc/COPYING.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_license_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"LICENSE-\xff.txt");
        assert!(is_license_file(Path::new(name)));
        assert!(!is_license_file(Path::new(OsStr::from_bytes(b"README\xff"))));
    }

    #[test]
    fn test_copying_block() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/ogg/COPYING.txt", "MIT License");

        let pkg = InstalledPackage::new("ogg", "1.3.5", "/deps/ogg");
        let doc = aggregate(&fs, [&pkg]);

        assert_eq!(doc.as_str(), "ogg/1.3.5\nMIT License\n\n");
        assert_eq!(doc.contributors(), &["ogg/1.3.5".to_string()]);
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/fmt/licenses/LICENSE", "\n\n  Copyright (c) fmt  \n\n");

        let pkg = InstalledPackage::new("fmt", "11.1.4", "/deps/fmt");
        let doc = aggregate(&fs, [&pkg]);

        assert_eq!(doc.as_str(), "fmt/11.1.4\nCopyright (c) fmt\n\n");
    }

    #[test]
    fn test_package_without_licenses_contributes_nothing() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/sdl/include/SDL3/SDL.h", "#pragma once");
        fs.add_file("/deps/sdl/README.md", "SDL");

        let pkg = InstalledPackage::new("sdl", "3.2.6", "/deps/sdl");
        let doc = aggregate(&fs, [&pkg]);

        assert_eq!(doc.as_str(), "");
        assert!(doc.contributors().is_empty());
    }

    #[test]
    fn test_build_only_and_pathless_are_skipped() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/cmake/LICENSE", "BSD");
        fs.add_file("/deps/vorbis/COPYING", "BSD-3");

        let cmake = InstalledPackage::new("cmake", "3.31.0", "/deps/cmake").build_only();
        let vorbis = InstalledPackage::new("vorbis", "1.3.7", "/deps/vorbis").without_path();

        let doc = aggregate(&fs, [&cmake, &vorbis]);
        assert_eq!(doc.as_str(), "");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/lua/COPYRIGHT", b"Lua \xff\xfe License".to_vec());

        let pkg = InstalledPackage::new("lua", "5.4.7", "/deps/lua");
        let doc = aggregate(&fs, [&pkg]);

        assert!(doc.as_str().starts_with("lua/5.4.7\nLua "));
        assert!(doc.as_str().contains('\u{FFFD}'));
        assert!(doc.as_str().ends_with(" License\n\n"));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let mut fs = MockFileSystem::new();
        fs.add_unreadable("/deps/sdl/LICENSE.txt");
        fs.add_file("/deps/sdl/COPYING", "zlib");

        let pkg = InstalledPackage::new("sdl", "3.2.6", "/deps/sdl");
        let doc = aggregate(&fs, [&pkg]);

        assert_eq!(doc.as_str(), "sdl/3.2.6\nzlib\n\n");
    }

    #[test]
    fn test_order_follows_package_order() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/b/LICENSE", "B");
        fs.add_file("/deps/a/LICENSE", "A");

        let b = InstalledPackage::new("b", "1.0.0", "/deps/b");
        let a = InstalledPackage::new("a", "1.0.0", "/deps/a");

        let doc = aggregate(&fs, [&b, &a]);
        assert_eq!(doc.as_str(), "b/1.0.0\nB\n\na/1.0.0\nA\n\n");
    }

    #[test]
    fn test_one_block_per_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/deps/openssl/licenses/LICENSE.txt", "Apache-2.0");
        fs.add_file("/deps/openssl/licenses/COPYRIGHT", "OpenSSL authors");

        let pkg = InstalledPackage::new("openssl", "3.4.1", "/deps/openssl");
        let doc = aggregate(&fs, [&pkg]);

        assert_eq!(
            doc.as_str(),
            "openssl/3.4.1\nOpenSSL authors\n\nopenssl/3.4.1\nApache-2.0\n\n"
        );
    }

    #[test]
    fn test_disk_aggregation_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let pkg_dir = tmp.path().join("physfs");
        std::fs::create_dir_all(pkg_dir.join("licenses")).unwrap();
        std::fs::write(pkg_dir.join("licenses/LICENSE.txt"), "zlib License\n").unwrap();
        std::fs::write(pkg_dir.join("licenses/copying"), "extra terms").unwrap();

        let out = tmp.path().join("out");
        let pkg = InstalledPackage::new("physfs", "3.2.0", &pkg_dir);

        let first = aggregate(&DiskTree, [&pkg]);
        let path = first.write(&out).unwrap();
        let first_bytes = std::fs::read(&path).unwrap();

        let second = aggregate(&DiskTree, [&pkg]);
        second.write(&out).unwrap();
        let second_bytes = std::fs::read(&path).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(
            String::from_utf8(first_bytes).unwrap(),
            "physfs/3.2.0\nzlib License\n\nphysfs/3.2.0\nextra terms\n\n"
        );
    }
}
