//! Installed packages reported by the external package installer.
//!
//! The installer runs between option configuration and artifact emission.
//! It hands back every package it placed on disk, direct and transitive, in
//! its own resolution order. Build-tool packages carry `build_only = true`
//! and usually have no install path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package reference name
    pub name: String,

    /// Installed version, as the installer reports it
    pub version: String,

    /// Package folder, absent for packages that were not unpacked locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Build-context package (tools, generators)
    #[serde(default)]
    pub build_only: bool,
}

impl InstalledPackage {
    /// Create a runtime package installed at `path`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        InstalledPackage {
            name: name.into(),
            version: version.into(),
            path: Some(path.into()),
            build_only: false,
        }
    }

    /// Mark as a build-context package.
    pub fn build_only(mut self) -> Self {
        self.build_only = true;
        self
    }

    /// Drop the install path.
    pub fn without_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// The `name/version` reference used in license headers.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// Folder to scan for licenses, if this package contributes any.
    pub fn license_root(&self) -> Option<&Path> {
        if self.build_only {
            return None;
        }
        self.path.as_deref()
    }
}

/// The full installed set, in installer order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSet {
    #[serde(default, rename = "package")]
    packages: Vec<InstalledPackage>,
}

impl InstalledSet {
    /// Create an installed set from packages.
    pub fn new(packages: Vec<InstalledPackage>) -> Self {
        InstalledSet { packages }
    }

    /// Load the installer's report. `.json` files are read as JSON,
    /// everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read installed packages: {}", path.display()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse installed packages: {}", path.display()))
        } else {
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse installed packages: {}", path.display()))
        }
    }

    /// Find an installed package by name.
    pub fn get(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Iterate in installer order.
    pub fn iter(&self) -> impl Iterator<Item = &InstalledPackage> {
        self.packages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("installed.toml");
        std::fs::write(
            &path,
            r#"
[[package]]
name = "fmt"
version = "11.1.4"
path = "/deps/fmt"

[[package]]
name = "cmake"
version = "3.31.0"
build_only = true
"#,
        )
        .unwrap();

        let set = InstalledSet::load(&path).unwrap();
        assert_eq!(set.iter().count(), 2);

        let fmt = set.get("fmt").unwrap();
        assert_eq!(fmt.reference(), "fmt/11.1.4");
        assert_eq!(fmt.license_root(), Some(Path::new("/deps/fmt")));

        let cmake = set.get("cmake").unwrap();
        assert!(cmake.build_only);
        assert_eq!(cmake.license_root(), None);
    }

    #[test]
    fn test_load_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("installed.json");
        std::fs::write(
            &path,
            r#"{"package": [{"name": "sdl", "version": "3.2.6", "path": "/deps/sdl"}]}"#,
        )
        .unwrap();

        let set = InstalledSet::load(&path).unwrap();
        assert_eq!(set.get("sdl").unwrap().version, "3.2.6");
    }

    #[test]
    fn test_build_only_with_path_is_skipped() {
        let pkg = InstalledPackage::new("pkgconf", "2.2.0", "/deps/pkgconf").build_only();
        assert_eq!(pkg.license_root(), None);
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let pkg = InstalledPackage::new("ogg", "1.3.5", "/deps/ogg").without_path();
        assert_eq!(pkg.license_root(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = InstalledSet::load(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read installed packages"));
    }
}
