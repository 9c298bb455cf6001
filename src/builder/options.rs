//! Per-package build option overrides.
//!
//! Options are derived from the platform profile and the build profile in a
//! single pass into a build-once map. Each option may be declared once per
//! package; declaring it again with a different value is a
//! `ConflictingOverride`, never a silent overwrite.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::capability;
use crate::core::platform::PlatformProfile;
use crate::resolver::{Resolve, ResolveError};

/// Value of a package option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Choice(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Choice(value.to_string())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            OptionValue::Choice(s) => write!(f, "{}", s),
        }
    }
}

/// A single `package:option=value` override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionOverride {
    pub package: String,
    pub option: String,
    pub value: OptionValue,
}

impl OptionOverride {
    pub fn new(package: &str, option: &str, value: impl Into<OptionValue>) -> Self {
        OptionOverride {
            package: package.to_string(),
            option: option.to_string(),
            value: value.into(),
        }
    }

    /// Build from a `package:option` key.
    pub fn parse(key: &str, value: OptionValue) -> Result<Self, ResolveError> {
        match key.split_once(':') {
            Some((package, option)) if !package.is_empty() && !option.is_empty() => {
                Ok(OptionOverride::new(package, option, value))
            }
            _ => Err(ResolveError::InvalidOptionKey {
                key: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for OptionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.package, self.option, self.value)
    }
}

/// Optional container formats of the filesystem-abstraction package.
///
/// All default to disabled; the build profile may enable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFormat {
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "7z")]
    SevenZip,
    #[serde(rename = "grp")]
    Grp,
    #[serde(rename = "wad")]
    Wad,
    #[serde(rename = "hog")]
    Hog,
    #[serde(rename = "mvl")]
    Mvl,
    #[serde(rename = "qpak")]
    Qpak,
    #[serde(rename = "slb")]
    Slb,
    #[serde(rename = "iso9660")]
    Iso9660,
    #[serde(rename = "vdf")]
    Vdf,
}

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 10] = [
        ArchiveFormat::Zip,
        ArchiveFormat::SevenZip,
        ArchiveFormat::Grp,
        ArchiveFormat::Wad,
        ArchiveFormat::Hog,
        ArchiveFormat::Mvl,
        ArchiveFormat::Qpak,
        ArchiveFormat::Slb,
        ArchiveFormat::Iso9660,
        ArchiveFormat::Vdf,
    ];

    /// Option name on the physfs package.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::SevenZip => "7z",
            ArchiveFormat::Grp => "grp",
            ArchiveFormat::Wad => "wad",
            ArchiveFormat::Hog => "hog",
            ArchiveFormat::Mvl => "mvl",
            ArchiveFormat::Qpak => "qpak",
            ArchiveFormat::Slb => "slb",
            ArchiveFormat::Iso9660 => "iso9660",
            ArchiveFormat::Vdf => "vdf",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArchiveFormat {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ArchiveFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .ok_or_else(|| ResolveError::UnknownArchiveFormat {
                name: s.to_string(),
                valid: ArchiveFormat::ALL
                    .iter()
                    .map(|f| f.as_str().to_string())
                    .collect(),
            })
    }
}

/// Build-profile inputs that are configuration, not capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildProfile {
    /// Container format compiled into physfs, if any
    pub archive_format: Option<ArchiveFormat>,
    /// Project-declared overrides, applied after the derived ones
    pub options: Vec<OptionOverride>,
}

impl BuildProfile {
    pub fn with_archive_format(mut self, format: ArchiveFormat) -> Self {
        self.archive_format = Some(format);
        self
    }

    pub fn with_option(mut self, item: OptionOverride) -> Self {
        self.options.push(item);
        self
    }
}

/// Options for one package, keyed by option name.
pub type OptionSet = BTreeMap<String, OptionValue>;

/// Resolved options for every configured package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionMap {
    packages: BTreeMap<String, OptionSet>,
}

impl OptionMap {
    /// Options for a package (empty if none were set).
    pub fn package(&self, name: &str) -> Option<&OptionSet> {
        self.packages.get(name)
    }

    /// Look up a single option.
    pub fn get(&self, package: &str, option: &str) -> Option<&OptionValue> {
        self.packages.get(package).and_then(|set| set.get(option))
    }

    /// Iterate as flat overrides, sorted by package then option.
    pub fn overrides(&self) -> impl Iterator<Item = OptionOverride> + '_ {
        self.packages.iter().flat_map(|(package, set)| {
            set.iter().map(move |(option, value)| OptionOverride {
                package: package.clone(),
                option: option.clone(),
                value: value.clone(),
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Collects overrides and rejects conflicting redeclarations.
#[derive(Debug)]
pub struct OptionBuilder {
    platform: String,
    packages: BTreeMap<String, OptionSet>,
}

impl OptionBuilder {
    pub fn new(platform: impl Into<String>) -> Self {
        OptionBuilder {
            platform: platform.into(),
            packages: BTreeMap::new(),
        }
    }

    /// Declare `package:option=value`.
    ///
    /// Redeclaring the same value is accepted; a different value is fatal.
    pub fn set(
        &mut self,
        package: &str,
        option: &str,
        value: impl Into<OptionValue>,
    ) -> Result<&mut Self, ResolveError> {
        let value = value.into();
        let set = self.packages.entry(package.to_string()).or_default();

        match set.get(option) {
            Some(existing) if *existing != value => {
                return Err(ResolveError::ConflictingOverride {
                    package: package.to_string(),
                    option: option.to_string(),
                    first: existing.to_string(),
                    second: value.to_string(),
                    platform: self.platform.clone(),
                });
            }
            Some(_) => {}
            None => {
                set.insert(option.to_string(), value);
            }
        }

        Ok(self)
    }

    pub fn finish(self) -> OptionMap {
        OptionMap {
            packages: self.packages,
        }
    }
}

/// Derives package options from the resolved list and profiles.
pub struct OptionConfigurator<'a> {
    resolve: &'a Resolve,
    profile: &'a PlatformProfile,
    build: &'a BuildProfile,
}

impl<'a> OptionConfigurator<'a> {
    pub fn new(
        resolve: &'a Resolve,
        profile: &'a PlatformProfile,
        build: &'a BuildProfile,
    ) -> Self {
        OptionConfigurator {
            resolve,
            profile,
            build,
        }
    }

    /// Build the option map.
    pub fn configure(&self) -> Result<OptionMap, ResolveError> {
        let mut options = OptionBuilder::new(self.profile.os_name());

        self.linkage(&mut options)?;
        self.archive_formats(&mut options)?;
        self.scripting_backend(&mut options)?;
        self.graphics(&mut options)?;
        self.crash_reporting(&mut options)?;
        self.declared(&mut options)?;

        let options = options.finish();
        for item in options.overrides() {
            tracing::debug!("option {}", item);
        }
        Ok(options)
    }

    fn resolved(&self, package: &str) -> bool {
        self.resolve.contains(package)
    }

    /// Header-only and static-only toggles.
    fn linkage(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        const TOGGLES: &[(&str, &str, bool)] = &[
            ("fmt", "header_only", true),
            ("boost", "header_only", true),
            ("sdl", "shared", false),
            ("openal-soft", "shared", false),
        ];

        for (package, option, value) in TOGGLES {
            if self.resolved(package) {
                options.set(package, option, *value)?;
            }
        }
        Ok(())
    }

    /// Every container format off, except the one the build profile picks.
    fn archive_formats(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        if !self.resolved("physfs") {
            return Ok(());
        }

        for format in ArchiveFormat::ALL {
            let enabled = self.build.archive_format == Some(format);
            options.set("physfs", format.as_str(), enabled)?;
        }
        Ok(())
    }

    /// sol2 binds against LuaJIT where JIT is allowed, PUC Lua elsewhere.
    fn scripting_backend(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        if !self.resolved("sol2") {
            return Ok(());
        }

        let backend = if self.profile.is_jit_capable() {
            "luajit"
        } else {
            "lua"
        };
        options.set("sol2", "with_lua", backend)?;
        Ok(())
    }

    fn graphics(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        if self.resolved("sdl") && self.profile.is_webassembly() {
            options.set("sdl", "vulkan", false)?;
        }
        Ok(())
    }

    /// Out-of-process handler on Windows and macOS, in-process elsewhere.
    fn crash_reporting(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        if !self.resolved("sentry-native") {
            return Ok(());
        }

        let backend = if capability::has_out_of_process_crash_handler(self.profile.os_name()) {
            "crashpad"
        } else {
            "inproc"
        };
        options
            .set("sentry-native", "backend", backend)?
            .set("sentry-native", "shared", false)?;
        Ok(())
    }

    /// Project-declared overrides. They pass the same conflict check as the
    /// derived ones, so they can add options but never flip one.
    fn declared(&self, options: &mut OptionBuilder) -> Result<(), ResolveError> {
        for item in &self.build.options {
            if !self.resolved(&item.package) {
                tracing::debug!("ignoring {}: `{}` is not resolved", item, item.package);
                continue;
            }
            options.set(&item.package, &item.option, item.value.clone())?;
        }
        Ok(())
    }
}
