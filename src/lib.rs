//! carimbo-deps - Platform-conditional dependency resolution for the Carimbo engine
//!
//! This crate decides, from a target platform's identity, which third-party
//! packages the engine build needs, which options those packages are built
//! with, which capability flags reach the compiler, and which license texts
//! ship with the result.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory filesystem and installed
/// package fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    capability::Capability,
    installed::InstalledSet,
    package_id::PackageId,
    platform::{PlatformProfile, Settings},
};

pub use resolver::{DependencyResolver, Resolve};
pub use util::context::GlobalContext;
