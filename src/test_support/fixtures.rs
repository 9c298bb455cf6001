//! Test fixtures for common test scenarios.
//!
//! An [`InstalledFixture`] plays the part of the external package installer:
//! it lays package folders out on disk and writes the report that
//! `generate` reads back.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::installed::{InstalledPackage, InstalledSet};
use crate::resolver::DependencyResolver;

/// Installed packages laid out in a temporary directory.
pub struct InstalledFixture {
    root: TempDir,
    packages: Vec<InstalledPackage>,
}

impl InstalledFixture {
    /// An empty installation.
    pub fn new() -> Self {
        InstalledFixture {
            root: TempDir::new().expect("failed to create temp dir"),
            packages: Vec::new(),
        }
    }

    /// Install every package that resolves for `os`, each with a
    /// `LICENSE` file reading "<name> license".
    pub fn for_platform(os: &str) -> Self {
        let profile = crate::core::platform::PlatformProfile::new(os);
        let resolve = DependencyResolver::new()
            .and_then(|resolver| resolver.resolve(&profile))
            .expect("catalog resolves");

        let mut fixture = Self::new();
        for spec in resolve.packages() {
            let text = format!("{} license", spec.name());
            fixture.install(spec.name(), &spec.version().to_string(), Some(&text));
        }
        fixture
    }

    /// Install a runtime package, optionally with a `LICENSE` file.
    pub fn install(&mut self, name: &str, version: &str, license: Option<&str>) -> &mut Self {
        let dir = self.package_dir(name);
        std::fs::create_dir_all(dir.join("include")).expect("failed to create package dir");
        if let Some(text) = license {
            std::fs::write(dir.join("LICENSE"), text).expect("failed to write license");
        }
        self.packages.push(InstalledPackage::new(name, version, dir));
        self
    }

    /// Write an extra file inside an installed package folder.
    pub fn add_file(&mut self, name: &str, relative: &str, content: &str) -> &mut Self {
        let path = self.package_dir(name).join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(path, content).expect("failed to write file");
        self
    }

    /// Install a build-context tool with a license the manifest must skip.
    pub fn install_build_tool(&mut self, name: &str, version: &str) -> &mut Self {
        let dir = self.package_dir(name);
        std::fs::create_dir_all(&dir).expect("failed to create package dir");
        std::fs::write(dir.join("LICENSE"), format!("{} tool license", name))
            .expect("failed to write license");
        self.packages
            .push(InstalledPackage::new(name, version, dir).build_only());
        self
    }

    /// Drop a package from the report.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.packages.retain(|p| p.name != name);
        self
    }

    /// Change the reported version of a package.
    pub fn set_version(&mut self, name: &str, version: &str) -> &mut Self {
        if let Some(pkg) = self.packages.iter_mut().find(|p| p.name == name) {
            pkg.version = version.to_string();
        }
        self
    }

    /// Folder a package is (or would be) installed into.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.root.path().join("p").join(name)
    }

    /// The report as an in-memory set.
    pub fn installed(&self) -> InstalledSet {
        InstalledSet::new(self.packages.clone())
    }

    /// Write the report as `installed.toml` and return its path.
    pub fn write_report(&self) -> PathBuf {
        let path = self.root.path().join("installed.toml");
        let text = toml::to_string(&self.installed()).expect("failed to serialize report");
        std::fs::write(&path, text).expect("failed to write report");
        path
    }
}

impl Default for InstalledFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_report_round_trips() {
        let mut fixture = InstalledFixture::new();
        fixture
            .install("ogg", "1.3.5", Some("BSD"))
            .install_build_tool("cmake", "3.31.0");

        let path = fixture.write_report();
        let loaded = InstalledSet::load(&path).unwrap();

        assert_eq!(loaded, fixture.installed());
        assert!(loaded.get("cmake").unwrap().build_only);
        assert!(fixture.package_dir("ogg").join("LICENSE").is_file());
    }

    #[test]
    fn test_fixture_for_platform_covers_resolution() {
        let fixture = InstalledFixture::for_platform("emscripten");
        let installed = fixture.installed();

        assert!(installed.get("lua").is_some());
        assert!(installed.get("luajit").is_none());
        assert!(installed.get("openssl").is_none());
    }
}
