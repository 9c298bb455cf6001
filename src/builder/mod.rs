//! Build-side outputs.
//!
//! Per-package build options, the toolchain description with its define
//! flags, and the aggregated license manifest.

pub mod licenses;
pub mod options;
pub mod toolchain;

pub use licenses::{aggregate, LicenseAggregator, LicenseDocument, LicenseRecord};
pub use options::{
    ArchiveFormat, BuildProfile, OptionBuilder, OptionConfigurator, OptionMap, OptionOverride,
    OptionValue,
};
pub use toolchain::{FlagSet, Toolchain, ToolchainEmitter};
