//! High-level operations.
//!
//! This module contains the implementation of carimbo-deps commands.

pub mod generate;
pub mod resolve;

pub use generate::{
    generate, generate_licenses, manifest_order, verify_installed, GenerateResult,
};
pub use resolve::{resolve_platform, ResolutionPlan};
