//! Platform resolution: everything decided from the platform identity alone.

use serde::Serialize;

use crate::builder::options::{BuildProfile, OptionConfigurator, OptionMap};
use crate::builder::toolchain::{FlagSet, ToolchainEmitter};
use crate::core::platform::{PlatformProfile, Settings};
use crate::resolver::{DependencyResolver, Resolve, ResolveError};

/// Result of a resolution pass, before any package is installed.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionPlan {
    pub settings: Settings,
    pub profile: PlatformProfile,
    pub build: BuildProfile,
    pub resolve: Resolve,
    pub options: OptionMap,
    pub flags: FlagSet,
}

impl ResolutionPlan {
    /// Toolchain emitter for this plan's platform.
    pub fn emitter(&self) -> ToolchainEmitter<'_> {
        ToolchainEmitter::new(&self.settings, &self.profile)
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("platform: {}\n", self.settings));
        let caps: Vec<_> = self
            .profile
            .capabilities()
            .iter()
            .map(|c| c.to_string())
            .collect();
        out.push_str(&format!(
            "capabilities: {}\n",
            if caps.is_empty() {
                "(none)".to_string()
            } else {
                caps.join(", ")
            }
        ));

        out.push_str("\ndependencies:\n");
        for spec in self.resolve.packages() {
            out.push_str(&format!("  {} [{}]", spec.id(), spec.condition()));
            if !spec.is_required() {
                out.push_str(&format!(" ({})", spec.kind()));
            }
            out.push('\n');
        }

        if !self.options.is_empty() {
            out.push_str("\noptions:\n");
            for item in self.options.overrides() {
                out.push_str(&format!("  {}\n", item));
            }
        }

        if !self.flags.is_empty() {
            out.push_str("\ndefines:\n");
            for name in self.flags.preprocessor_definitions.keys() {
                out.push_str(&format!("  {}\n", name));
            }
        }

        out
    }
}

/// Resolve dependencies, options and flags for `settings`.
///
/// Pure: the same inputs always give the same plan, and nothing is read
/// from or written to disk.
pub fn resolve_platform(
    settings: &Settings,
    build: &BuildProfile,
) -> Result<ResolutionPlan, ResolveError> {
    let profile = settings.profile();
    tracing::debug!("resolving for {} ({})", settings, profile);

    let resolve = DependencyResolver::new()?.resolve(&profile)?;
    let options = OptionConfigurator::new(&resolve, &profile, build).configure()?;
    let flags = ToolchainEmitter::new(settings, &profile).flags();

    Ok(ResolutionPlan {
        settings: settings.clone(),
        profile,
        build: build.clone(),
        resolve,
        options,
        flags,
    })
}
