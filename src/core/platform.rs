//! Platform identity and derived capabilities.
//!
//! `Settings` is what the build orchestrator hands us (os, arch, compiler,
//! build type). `PlatformProfile` is the normalized view used by every
//! resolution step: the OS name plus capability flags computed once at
//! construction.

use serde::{Deserialize, Serialize};

use crate::core::capability::{self, Capability};

/// CMake-style build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Get the build type as CMake spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BuildType {
    type Err = BuildTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(BuildTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid build type.
#[derive(Debug, Clone)]
pub struct BuildTypeParseError(pub String);

impl std::fmt::Display for BuildTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid build type '{}', valid values: Debug, Release, RelWithDebInfo, MinSizeRel",
            self.0
        )
    }
}

impl std::error::Error for BuildTypeParseError {}

/// Platform identity supplied by the invoking orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Operating system (emscripten, windows, macos, linux, ...)
    pub os: String,
    /// CPU architecture (x86_64, armv8, wasm, ...)
    pub arch: String,
    /// Compiler family, if known
    pub compiler: Option<String>,
    /// Build type
    pub build_type: BuildType,
}

impl Settings {
    /// Create settings for an OS with host defaults for everything else.
    pub fn new(os: impl Into<String>) -> Self {
        Settings {
            os: os.into(),
            arch: std::env::consts::ARCH.to_string(),
            compiler: None,
            build_type: BuildType::default(),
        }
    }

    /// Detect the host platform.
    pub fn host() -> Self {
        Settings::new(std::env::consts::OS)
    }

    /// Set the architecture.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Set the compiler family.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }

    /// Set the build type.
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Build the normalized platform profile.
    pub fn profile(&self) -> PlatformProfile {
        PlatformProfile::new(&self.os)
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)?;
        if let Some(ref compiler) = self.compiler {
            write!(f, "/{}", compiler)?;
        }
        write!(f, "/{}", self.build_type)
    }
}

/// Normalized platform identity and its capability flags.
///
/// Flags are computed once from `os_name` and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    os_name: String,
    is_webassembly: bool,
    is_jit_capable: bool,
    is_ios: bool,
    has_commercial_store_integration: bool,
    has_crash_reporting: bool,
    has_native_networking: bool,
}

impl PlatformProfile {
    /// Classify a raw OS name.
    pub fn new(os_name: &str) -> Self {
        PlatformProfile {
            os_name: os_name.to_string(),
            is_webassembly: capability::is_webassembly(os_name),
            is_jit_capable: capability::is_jit_capable(os_name),
            is_ios: capability::is_ios(os_name),
            has_commercial_store_integration: capability::has_commercial_store_integration(
                os_name,
            ),
            has_crash_reporting: capability::has_crash_reporting(os_name),
            has_native_networking: capability::has_native_networking(os_name),
        }
    }

    /// The OS name exactly as supplied.
    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    pub fn is_webassembly(&self) -> bool {
        self.is_webassembly
    }

    pub fn is_jit_capable(&self) -> bool {
        self.is_jit_capable
    }

    pub fn is_ios(&self) -> bool {
        self.is_ios
    }

    pub fn has_commercial_store_integration(&self) -> bool {
        self.has_commercial_store_integration
    }

    pub fn has_crash_reporting(&self) -> bool {
        self.has_crash_reporting
    }

    pub fn has_native_networking(&self) -> bool {
        self.has_native_networking
    }

    /// Look up a capability flag.
    pub fn has(&self, cap: Capability) -> bool {
        match cap {
            Capability::WebAssembly => self.is_webassembly,
            Capability::Jit => self.is_jit_capable,
            Capability::Ios => self.is_ios,
            Capability::CommercialStore => self.has_commercial_store_integration,
            Capability::CrashReporting => self.has_crash_reporting,
            Capability::NativeNetworking => self.has_native_networking,
        }
    }

    /// Capabilities that hold for this platform, in display order.
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.has(*cap))
            .collect()
    }
}

impl std::fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.os_name)
    }
}
