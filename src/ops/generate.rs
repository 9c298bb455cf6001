//! Implementation of `carimbo-deps generate` and `carimbo-deps licenses`.
//!
//! Runs after the external installer has placed packages on disk. Both
//! artifacts are rendered in memory first and only written once every check
//! has passed, so a fatal error never leaves a partial output directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::licenses::{aggregate, LicenseDocument, LICENSES_FILE};
use crate::builder::toolchain::{Toolchain, TOOLCHAIN_FILE};
use crate::core::installed::{InstalledPackage, InstalledSet};
use crate::ops::resolve::ResolutionPlan;
use crate::resolver::{Resolve, ResolveError};
use crate::util::fs::{write_atomic_all, FileTree};

/// Outcome of a generation pass.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Path of the toolchain description, if written
    pub toolchain: Option<PathBuf>,
    /// Path of the license manifest
    pub licenses: PathBuf,
    /// Packages that contributed license text, in manifest order
    pub contributors: Vec<String>,
    /// Non-fatal findings for the caller to report
    pub warnings: Vec<String>,
}

/// Check the installed set against the resolution.
///
/// A missing required dependency is fatal. Version mismatches only produce
/// warnings; version solving belongs to the installer.
pub fn verify_installed(
    resolve: &Resolve,
    installed: &InstalledSet,
) -> Result<Vec<String>, ResolveError> {
    let mut warnings = Vec::new();

    for spec in resolve.packages() {
        let Some(pkg) = installed.get(spec.name()) else {
            if spec.is_required() {
                return Err(ResolveError::MissingDependency {
                    package: spec.id().to_string(),
                    platform: resolve.platform().to_string(),
                });
            }
            tracing::debug!("{} {} not installed", spec.kind(), spec.id());
            continue;
        };

        let expected = spec.version().to_string();
        if pkg.version != expected {
            let warning = format!(
                "installed `{}` is {}, expected {}",
                pkg.name, pkg.version, expected
            );
            tracing::debug!("{}", warning);
            warnings.push(warning);
        }
    }

    Ok(warnings)
}

/// Installed packages in manifest order: resolved dependencies in
/// resolution order, then everything else in installer order.
pub fn manifest_order<'a>(
    resolve: &Resolve,
    installed: &'a InstalledSet,
) -> Vec<&'a InstalledPackage> {
    let mut ordered: Vec<&InstalledPackage> = resolve
        .packages()
        .filter_map(|spec| installed.get(spec.name()))
        .collect();

    ordered.extend(installed.iter().filter(|pkg| !resolve.contains(&pkg.name)));
    ordered
}

/// Render the license manifest without writing it.
pub fn render_licenses<T: FileTree>(
    tree: &T,
    resolve: &Resolve,
    installed: &InstalledSet,
) -> LicenseDocument {
    aggregate(tree, manifest_order(resolve, installed))
}

/// Render the toolchain description without writing it.
pub fn render_toolchain(plan: &ResolutionPlan, installed: &InstalledSet) -> Toolchain {
    let prefix_paths = manifest_order(&plan.resolve, installed)
        .into_iter()
        .filter_map(|pkg| pkg.path.clone())
        .collect();

    plan.emitter().toolchain(prefix_paths)
}

/// Write the toolchain description and the license manifest.
///
/// Both files are replaced together; if either cannot be written, neither
/// changes.
pub fn generate<T: FileTree>(
    tree: &T,
    plan: &ResolutionPlan,
    installed: &InstalledSet,
    output_dir: &Path,
) -> Result<GenerateResult> {
    let warnings = verify_installed(&plan.resolve, installed)?;

    let toolchain = render_toolchain(plan, installed);
    let licenses = render_licenses(tree, &plan.resolve, installed);

    let toolchain_path = output_dir.join(TOOLCHAIN_FILE);
    let licenses_path = output_dir.join(LICENSES_FILE);
    let rendered = toolchain.render();
    write_atomic_all(&[
        (toolchain_path.as_path(), rendered.as_bytes()),
        (licenses_path.as_path(), licenses.as_str().as_bytes()),
    ])?;
    tracing::info!("wrote {}", toolchain_path.display());
    tracing::info!(
        "wrote {} ({} packages)",
        licenses_path.display(),
        licenses.contributors().len()
    );

    Ok(GenerateResult {
        toolchain: Some(toolchain_path),
        licenses: licenses_path,
        contributors: licenses.contributors().to_vec(),
        warnings,
    })
}

/// Write only the license manifest.
pub fn generate_licenses<T: FileTree>(
    tree: &T,
    plan: &ResolutionPlan,
    installed: &InstalledSet,
    output_dir: &Path,
) -> Result<GenerateResult> {
    let warnings = verify_installed(&plan.resolve, installed)?;

    let licenses = render_licenses(tree, &plan.resolve, installed);
    let licenses_path = licenses.write(output_dir)?;
    tracing::info!("wrote {}", licenses_path.display());

    Ok(GenerateResult {
        toolchain: None,
        licenses: licenses_path,
        contributors: licenses.contributors().to_vec(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::options::{BuildProfile, OptionOverride};
    use crate::core::platform::Settings;
    use crate::ops::resolve::resolve_platform;
    use crate::test_support::InstalledFixture;
    use crate::util::fs::DiskTree;
    use tempfile::TempDir;

    fn plan(os: &str) -> ResolutionPlan {
        resolve_platform(&Settings::new(os), &BuildProfile::default()).unwrap()
    }

    #[test]
    fn test_generate_writes_both_artifacts() {
        let fixture = InstalledFixture::for_platform("linux");
        let out = TempDir::new().unwrap();

        let result =
            generate(&DiskTree, &plan("linux"), &fixture.installed(), out.path()).unwrap();

        assert_eq!(result.toolchain, Some(out.path().join(TOOLCHAIN_FILE)));
        assert_eq!(result.licenses, out.path().join(LICENSES_FILE));
        assert!(result.warnings.is_empty());

        let text = std::fs::read_to_string(&result.licenses).unwrap();
        assert!(text.starts_with("fmt/11.1.4\nfmt license\n\n"));
        assert!(text.contains("openssl/3.4.1\nopenssl license\n\n"));

        let toolchain = std::fs::read_to_string(out.path().join(TOOLCHAIN_FILE)).unwrap();
        assert!(toolchain.contains("HAS_LUAJIT=1"));
        assert!(toolchain.contains("CMAKE_PREFIX_PATH"));
    }

    #[test]
    fn test_emscripten_has_no_openssl_entry() {
        let fixture = InstalledFixture::for_platform("emscripten");
        let out = TempDir::new().unwrap();

        generate(&DiskTree, &plan("emscripten"), &fixture.installed(), out.path()).unwrap();

        let text = std::fs::read_to_string(out.path().join(LICENSES_FILE)).unwrap();
        assert!(!text.contains("openssl/"));
        assert!(!text.contains("luajit/"));
        assert!(text.contains("lua/5.4.7\nlua license\n\n"));
    }

    #[test]
    fn test_copying_file_is_collected() {
        let mut fixture = InstalledFixture::for_platform("linux");
        fixture.add_file("ogg", "COPYING.txt", "MIT License");
        let out = TempDir::new().unwrap();

        generate(&DiskTree, &plan("linux"), &fixture.installed(), out.path()).unwrap();

        let text = std::fs::read_to_string(out.path().join(LICENSES_FILE)).unwrap();
        assert!(text.contains("ogg/1.3.5\nMIT License\n\n"));
    }

    #[test]
    fn test_missing_dependency_writes_nothing() {
        let mut fixture = InstalledFixture::for_platform("windows");
        fixture.remove("openssl");
        let out = TempDir::new().unwrap();
        let dir = out.path().join("build");

        let err = generate(&DiskTree, &plan("windows"), &fixture.installed(), &dir).unwrap_err();

        match err.downcast_ref::<ResolveError>() {
            Some(ResolveError::MissingDependency { package, platform }) => {
                assert_eq!(package, "openssl/3.4.1");
                assert_eq!(platform, "windows");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_conflicting_override_writes_nothing() {
        let fixture = InstalledFixture::for_platform("windows");
        let out = TempDir::new().unwrap();
        let build =
            BuildProfile::default().with_option(OptionOverride::new("boost", "header_only", false));

        let result = resolve_platform(&Settings::new("windows"), &build)
            .map_err(anyhow::Error::from)
            .and_then(|plan| generate(&DiskTree, &plan, &fixture.installed(), out.path()));

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::ConflictingOverride { package, .. }) if package == "boost"
        ));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_override_may_be_absent() {
        let mut fixture = InstalledFixture::for_platform("linux");
        fixture.remove("libalsa");

        let warnings = verify_installed(&plan("linux").resolve, &fixture.installed()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_version_mismatch_is_a_warning() {
        let mut fixture = InstalledFixture::for_platform("macos");
        fixture.set_version("sdl", "3.2.4");

        let warnings = verify_installed(&plan("macos").resolve, &fixture.installed()).unwrap();
        assert_eq!(warnings, vec!["installed `sdl` is 3.2.4, expected 3.2.6".to_string()]);
    }

    #[test]
    fn test_transitive_packages_follow_resolved_ones() {
        let mut fixture = InstalledFixture::new();
        fixture.install("zlib", "1.3.1", Some("zlib license"));
        let resolved = InstalledFixture::for_platform("emscripten");
        for pkg in resolved.installed().iter() {
            let text = format!("{} license", pkg.name);
            fixture.install(&pkg.name, &pkg.version, Some(&text));
        }
        fixture.install_build_tool("cmake", "3.31.0");

        let plan = plan("emscripten");
        let installed = fixture.installed();
        let order: Vec<_> = manifest_order(&plan.resolve, &installed)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(order.first(), Some(&"fmt"));
        assert_eq!(&order[order.len() - 2..], &["zlib", "cmake"]);

        let doc = render_licenses(&DiskTree, &plan.resolve, &installed);
        assert!(doc.as_str().ends_with("zlib/1.3.1\nzlib license\n\n"));
        assert!(!doc.as_str().contains("cmake"));
    }

    #[test]
    fn test_licenses_only() {
        let fixture = InstalledFixture::for_platform("android");
        let out = TempDir::new().unwrap();

        let result =
            generate_licenses(&DiskTree, &plan("android"), &fixture.installed(), out.path())
                .unwrap();

        assert!(result.toolchain.is_none());
        assert!(result.licenses.is_file());
        assert!(!out.path().join(TOOLCHAIN_FILE).exists());
    }

    #[test]
    fn test_generate_is_idempotent() {
        let fixture = InstalledFixture::for_platform("linux");
        let out = TempDir::new().unwrap();
        let plan = plan("linux");

        generate(&DiskTree, &plan, &fixture.installed(), out.path()).unwrap();
        let first = std::fs::read(out.path().join(LICENSES_FILE)).unwrap();
        generate(&DiskTree, &plan, &fixture.installed(), out.path()).unwrap();
        let second = std::fs::read(out.path().join(LICENSES_FILE)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_license_write_leaves_toolchain_untouched() {
        let fixture = InstalledFixture::for_platform("linux");
        let out = TempDir::new().unwrap();
        std::fs::create_dir(out.path().join(LICENSES_FILE)).unwrap();

        let result = generate(&DiskTree, &plan("linux"), &fixture.installed(), out.path());
        assert!(result.is_err());
        assert!(!out.path().join(TOOLCHAIN_FILE).exists());

        std::fs::write(out.path().join(TOOLCHAIN_FILE), "# previous\n").unwrap();
        let result = generate(&DiskTree, &plan("linux"), &fixture.installed(), out.path());
        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(out.path().join(TOOLCHAIN_FILE)).unwrap(),
            "# previous\n"
        );
    }
}
