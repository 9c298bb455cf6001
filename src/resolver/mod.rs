//! Dependency resolution.
//!
//! Resolution here is selection, not version solving: each catalog entry
//! carries a pinned version and a platform condition, and resolving a
//! profile keeps the entries whose condition holds. The resolver is pure
//! and deterministic; version solving is left to the package installer.

pub mod catalog;
pub mod errors;
pub mod resolve;

pub use errors::ResolveError;
pub use resolve::Resolve;

use std::collections::BTreeMap;

use crate::core::dependency::DependencySpec;
use crate::core::platform::PlatformProfile;

/// Selects the dependencies that apply to a platform.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    declared: Vec<DependencySpec>,
}

impl DependencyResolver {
    /// Create a resolver over the built-in catalog.
    pub fn new() -> Result<Self, ResolveError> {
        Ok(DependencyResolver {
            declared: catalog::declared()?,
        })
    }

    /// Create a resolver over an explicit declaration list.
    pub fn with_declarations(declared: Vec<DependencySpec>) -> Self {
        DependencyResolver { declared }
    }

    /// Every declared dependency, in declaration order.
    pub fn declared(&self) -> &[DependencySpec] {
        &self.declared
    }

    /// Resolve the dependency list for a platform.
    pub fn resolve(&self, profile: &PlatformProfile) -> Result<Resolve, ResolveError> {
        let packages: Vec<DependencySpec> = self
            .declared
            .iter()
            .filter(|dep| dep.applies_to(profile))
            .cloned()
            .collect();

        self.check_groups(profile, &packages)?;

        for dep in &packages {
            tracing::debug!("resolved {} ({})", dep.id(), dep.condition());
        }

        Ok(Resolve::new(profile.os_name(), packages))
    }

    /// Every exclusive group must resolve to exactly one member.
    fn check_groups(
        &self,
        profile: &PlatformProfile,
        resolved: &[DependencySpec],
    ) -> Result<(), ResolveError> {
        let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for dep in &self.declared {
            if let Some(group) = dep.group() {
                groups.entry(group).or_default();
            }
        }

        for dep in resolved {
            if let Some(group) = dep.group() {
                groups
                    .entry(group)
                    .or_default()
                    .push(dep.name().to_string());
            }
        }

        for (group, chosen) in groups {
            if chosen.len() != 1 {
                return Err(ResolveError::ExclusiveGroup {
                    group: group.to_string(),
                    platform: profile.os_name().to_string(),
                    chosen,
                });
            }
        }

        Ok(())
    }
}
