//! Core data structures for carimbo-deps.
//!
//! - Platform identity and capability predicates
//! - Pinned dependency declarations and their conditions
//! - Installed package records handed over by the package installer
//! - Define flags

pub mod capability;
pub mod define;
pub mod dependency;
pub mod installed;
pub mod package_id;
pub mod platform;

pub use capability::Capability;
pub use define::{DefineFlag, DefineValue};
pub use dependency::{Condition, DependencyKind, DependencySpec};
pub use installed::{InstalledPackage, InstalledSet};
pub use package_id::PackageId;
pub use platform::{BuildType, PlatformProfile, Settings};
