//! Capability classification.
//!
//! Capabilities are immutable facts derived from an OS name, not
//! configuration. Every classifier is a pure, total function of the raw
//! platform string: matching is case-insensitive, and an unrecognized name
//! answers `false` for every capability so nothing optional is pulled in for
//! a platform we know nothing about.

use serde::{Deserialize, Serialize};

/// A derived boolean property of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Runs inside the browser sandbox (emscripten/wasm).
    #[serde(rename = "webassembly")]
    WebAssembly,
    /// Allowed to generate machine code at runtime.
    Jit,
    /// Apple mobile targets.
    Ios,
    /// Ships through a commercial storefront (Steam).
    CommercialStore,
    /// Crash reports can be captured and uploaded.
    CrashReporting,
    /// A known, non-sandboxed OS with native sockets and TLS.
    NativeNetworking,
}

impl Capability {
    /// All capabilities, in display order.
    pub const ALL: [Capability; 6] = [
        Capability::WebAssembly,
        Capability::Jit,
        Capability::Ios,
        Capability::CommercialStore,
        Capability::CrashReporting,
        Capability::NativeNetworking,
    ];

    /// Get the capability name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::WebAssembly => "webassembly",
            Capability::Jit => "jit",
            Capability::Ios => "ios",
            Capability::CommercialStore => "commercial-store",
            Capability::CrashReporting => "crash-reporting",
            Capability::NativeNetworking => "native-networking",
        }
    }

    /// Evaluate this capability for a raw OS name.
    pub fn classify(&self, os_name: &str) -> bool {
        match self {
            Capability::WebAssembly => is_webassembly(os_name),
            Capability::Jit => is_jit_capable(os_name),
            Capability::Ios => is_ios(os_name),
            Capability::CommercialStore => has_commercial_store_integration(os_name),
            Capability::CrashReporting => has_crash_reporting(os_name),
            Capability::NativeNetworking => has_native_networking(os_name),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad OS family, the only thing the classifiers look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OsFamily {
    Web,
    AppleMobile,
    Android,
    Windows,
    Macos,
    Linux,
    FreeBsd,
    Unknown,
}

fn os_family(os_name: &str) -> OsFamily {
    match os_name.trim().to_ascii_lowercase().as_str() {
        "emscripten" | "wasm" | "wasm32" | "wasi" => OsFamily::Web,
        "ios" | "tvos" | "watchos" | "visionos" => OsFamily::AppleMobile,
        "android" => OsFamily::Android,
        "windows" | "win32" => OsFamily::Windows,
        "macos" | "darwin" | "osx" => OsFamily::Macos,
        "linux" => OsFamily::Linux,
        "freebsd" => OsFamily::FreeBsd,
        _ => OsFamily::Unknown,
    }
}

fn is_desktop(family: OsFamily) -> bool {
    matches!(family, OsFamily::Windows | OsFamily::Macos | OsFamily::Linux)
}

/// Browser-sandboxed WebAssembly target.
pub fn is_webassembly(os_name: &str) -> bool {
    os_family(os_name) == OsFamily::Web
}

/// Apple mobile target (iOS and its siblings).
pub fn is_ios(os_name: &str) -> bool {
    os_family(os_name) == OsFamily::AppleMobile
}

/// Whether the platform allows a JIT-compiling interpreter.
///
/// The web sandbox and Apple mobile forbid writable+executable pages.
pub fn is_jit_capable(os_name: &str) -> bool {
    matches!(
        os_family(os_name),
        OsFamily::Windows
            | OsFamily::Macos
            | OsFamily::Linux
            | OsFamily::FreeBsd
            | OsFamily::Android
    )
}

/// Steam ships on the three desktop platforms.
pub fn has_commercial_store_integration(os_name: &str) -> bool {
    is_desktop(os_family(os_name))
}

/// Crash reporting is wired up on the desktop platforms.
pub fn has_crash_reporting(os_name: &str) -> bool {
    is_desktop(os_family(os_name))
}

/// Whether crashes can be handed to a separate handler process. Not a
/// capability; it only picks the crash reporting backend.
pub fn has_out_of_process_crash_handler(os_name: &str) -> bool {
    matches!(os_family(os_name), OsFamily::Windows | OsFamily::Macos)
}

/// Any recognized OS outside the web sandbox.
pub fn has_native_networking(os_name: &str) -> bool {
    !matches!(os_family(os_name), OsFamily::Web | OsFamily::Unknown)
}
