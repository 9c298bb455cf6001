//! Toolchain description emission.
//!
//! Capability define flags feed two sinks: preprocessor definitions and
//! build-cache variables. Both sinks are built from the same flag list, so
//! a flag present in one is present in the other with the same value.
//! The rendered description is a CMake toolchain file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::capability::Capability;
use crate::core::define::{DefineFlag, DefineValue};
use crate::core::dependency::Condition;
use crate::core::platform::{PlatformProfile, Settings};

/// File name of the toolchain description inside the output directory.
pub const TOOLCHAIN_FILE: &str = "carimbo_toolchain.cmake";

/// A capability-gated define flag.
#[derive(Debug, Clone, Copy)]
pub struct FlagDeclaration {
    pub name: &'static str,
    pub condition: Condition,
}

/// Define flags for the capabilities that gate optional dependencies. The
/// engine sources test some features under more than one name, so those
/// capabilities carry every spelling.
pub const DEFINE_FLAGS: &[FlagDeclaration] = &[
    FlagDeclaration {
        name: "HAS_LUAJIT",
        condition: Condition::When(Capability::Jit),
    },
    FlagDeclaration {
        name: "HAS_STEAM",
        condition: Condition::When(Capability::CommercialStore),
    },
    FlagDeclaration {
        name: "HAS_SENTRY",
        condition: Condition::When(Capability::CrashReporting),
    },
    FlagDeclaration {
        name: "HAS_OPENSSL",
        condition: Condition::When(Capability::NativeNetworking),
    },
    FlagDeclaration {
        name: "HAS_BOOST",
        condition: Condition::When(Capability::NativeNetworking),
    },
    FlagDeclaration {
        name: "STEAM",
        condition: Condition::When(Capability::CommercialStore),
    },
    FlagDeclaration {
        name: "HAVE_SENTRY",
        condition: Condition::When(Capability::CrashReporting),
    },
    FlagDeclaration {
        name: "HAVE_BOOST",
        condition: Condition::When(Capability::NativeNetworking),
    },
];

/// Flags whose condition holds for the profile, in declaration order.
pub fn define_flags(profile: &PlatformProfile) -> Vec<DefineFlag> {
    DEFINE_FLAGS
        .iter()
        .filter(|decl| decl.condition.evaluate(profile))
        .map(|decl| DefineFlag::new(decl.name, true))
        .collect()
}

/// The two flag sinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagSet {
    pub preprocessor_definitions: BTreeMap<String, DefineValue>,
    pub cache_variables: BTreeMap<String, DefineValue>,
}

impl FlagSet {
    /// Fill both sinks from one flag list.
    pub fn from_flags(flags: &[DefineFlag]) -> Self {
        let mut set = FlagSet::default();
        for flag in flags {
            set.preprocessor_definitions
                .insert(flag.name.clone(), flag.value.clone());
            set.cache_variables
                .insert(flag.name.clone(), flag.value.clone());
        }
        set
    }

    /// Both sinks hold the same names with the same values.
    pub fn is_consistent(&self) -> bool {
        self.preprocessor_definitions == self.cache_variables
    }

    pub fn contains(&self, name: &str) -> bool {
        self.preprocessor_definitions.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.preprocessor_definitions.is_empty()
    }
}

/// Computes flag sets and toolchain descriptions for a platform.
pub struct ToolchainEmitter<'a> {
    settings: &'a Settings,
    profile: &'a PlatformProfile,
}

impl<'a> ToolchainEmitter<'a> {
    pub fn new(settings: &'a Settings, profile: &'a PlatformProfile) -> Self {
        ToolchainEmitter { settings, profile }
    }

    /// Compute the flag sinks.
    pub fn flags(&self) -> FlagSet {
        FlagSet::from_flags(&define_flags(self.profile))
    }

    /// Build the toolchain description. `prefix_paths` are the install
    /// folders handed over by the package installer, passed through as-is.
    pub fn toolchain(&self, prefix_paths: Vec<PathBuf>) -> Toolchain {
        Toolchain {
            settings: self.settings.clone(),
            flags: self.flags(),
            prefix_paths,
        }
    }
}

/// A rendered-on-demand toolchain description.
#[derive(Debug, Clone, Serialize)]
pub struct Toolchain {
    pub settings: Settings,
    pub flags: FlagSet,
    pub prefix_paths: Vec<PathBuf>,
}

impl Toolchain {
    /// Render as a CMake toolchain file.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("# Generated by carimbo-deps. Do not edit.\n");
        out.push_str(&format!("# platform: {}\n\n", self.settings));

        out.push_str(&cache_string("CMAKE_BUILD_TYPE", self.settings.build_type.as_str()));
        out.push_str(&cache_string("CARIMBO_TARGET_OS", &self.settings.os));
        out.push_str(&cache_string("CARIMBO_TARGET_ARCH", &self.settings.arch));
        if let Some(ref compiler) = self.settings.compiler {
            out.push_str(&cache_string("CARIMBO_COMPILER", compiler));
        }

        if !self.flags.preprocessor_definitions.is_empty() {
            out.push_str("\nadd_compile_definitions(\n");
            for (name, value) in &self.flags.preprocessor_definitions {
                out.push_str(&format!("  {}={}\n", name, value.to_preprocessor()));
            }
            out.push_str(")\n");
        }

        if !self.flags.cache_variables.is_empty() {
            out.push('\n');
            for (name, value) in &self.flags.cache_variables {
                out.push_str(&format!(
                    "set({} {} CACHE {} \"\" FORCE)\n",
                    name,
                    cmake_value(value),
                    value.cache_type()
                ));
            }
        }

        if !self.prefix_paths.is_empty() {
            out.push('\n');
            for path in &self.prefix_paths {
                out.push_str(&format!(
                    "list(APPEND CMAKE_PREFIX_PATH \"{}\")\n",
                    cmake_path(path)
                ));
            }
        }

        out
    }
}

fn cache_string(name: &str, value: &str) -> String {
    format!("set({} \"{}\" CACHE STRING \"\" FORCE)\n", name, value)
}

fn cmake_value(value: &DefineValue) -> String {
    match value {
        DefineValue::Bool(_) => value.to_cache(),
        DefineValue::Str(s) => format!("\"{}\"", s),
    }
}

/// CMake wants forward slashes on every platform.
fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
