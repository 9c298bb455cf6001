//! Resolve - the ordered, immutable set of dependencies for one platform.

use serde::Serialize;

use crate::core::dependency::DependencySpec;

/// The resolved dependency list.
///
/// Packages appear in catalog order. Once created, a Resolve is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Resolve {
    /// OS name the list was resolved for
    platform: String,

    /// Applicable dependencies, in resolution order
    packages: Vec<DependencySpec>,
}

impl Resolve {
    pub(crate) fn new(platform: impl Into<String>, packages: Vec<DependencySpec>) -> Self {
        Resolve {
            platform: platform.into(),
            packages,
        }
    }

    /// OS name this resolve belongs to.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Iterate over packages in resolution order.
    pub fn packages(&self) -> impl Iterator<Item = &DependencySpec> {
        self.packages.iter()
    }

    /// Get a package by name.
    pub fn get(&self, name: &str) -> Option<&DependencySpec> {
        self.packages.iter().find(|dep| dep.name() == name)
    }

    /// Check whether a package was resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
