//! Dependency specification.
//!
//! A DependencySpec describes one external package the engine may need:
//! its pinned version, the platform condition under which it is required,
//! and whether it is a direct requirement or only a version override for a
//! package that shows up transitively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::capability::Capability;
use crate::core::package_id::PackageId;
use crate::core::platform::PlatformProfile;

/// Platform predicate guarding a dependency, option or define flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Unconditional.
    Always,
    /// Holds when the capability is true.
    When(Capability),
    /// Holds when the capability is false.
    Unless(Capability),
}

impl Condition {
    /// Evaluate the condition against a platform profile.
    pub fn evaluate(&self, profile: &PlatformProfile) -> bool {
        match self {
            Condition::Always => true,
            Condition::When(cap) => profile.has(*cap),
            Condition::Unless(cap) => !profile.has(*cap),
        }
    }

    /// Whether this condition depends on a capability at all.
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Condition::Always)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "always"),
            Condition::When(cap) => write!(f, "{}", cap),
            Condition::Unless(cap) => write!(f, "!{}", cap),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// How a dependency participates in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Direct requirement; must be installed.
    #[default]
    Require,
    /// Version pin for a transitive package; may be absent.
    Override,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Require => "require",
            DependencyKind::Override => "override",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
    /// Package name and pinned version
    id: PackageId,

    /// When the package is required
    condition: Condition,

    /// Require or override
    kind: DependencyKind,

    /// Mutually exclusive group; exactly one member must resolve
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
}

impl DependencySpec {
    /// Create an unconditional requirement.
    pub fn new(id: PackageId) -> Self {
        DependencySpec {
            id,
            condition: Condition::Always,
            kind: DependencyKind::Require,
            group: None,
        }
    }

    /// Set the platform condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the dependency kind.
    pub fn with_kind(mut self, kind: DependencyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Place this dependency in a mutually exclusive group.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn version(&self) -> &semver::Version {
        self.id.version()
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the package must be present after installation.
    pub fn is_required(&self) -> bool {
        self.kind == DependencyKind::Require
    }

    /// Whether this dependency applies to the given platform.
    pub fn applies_to(&self, profile: &PlatformProfile) -> bool {
        self.condition.evaluate(profile)
    }
}
