//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.carimbo/config.toml` - User-wide defaults
//! - Project: `.carimbo/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::options::{ArchiveFormat, BuildProfile, OptionOverride, OptionValue};
use crate::core::platform::{BuildType, Settings};
use crate::resolver::ResolveError;

/// Default build output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// carimbo-deps configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Platform identity defaults
    pub platform: PlatformConfig,

    /// Extra package options, keyed `package:option`
    pub options: BTreeMap<String, OptionValue>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Where the toolchain and license manifest are written
    pub output_dir: Option<PathBuf>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    pub build_type: Option<String>,

    /// Container format compiled into physfs (zip, 7z, ...)
    pub archive_format: Option<String>,
}

/// Platform identity defaults, used when not given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub compiler: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.output_dir.is_some() {
            self.build.output_dir = other.build.output_dir;
        }
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.archive_format.is_some() {
            self.build.archive_format = other.build.archive_format;
        }

        if other.platform.os.is_some() {
            self.platform.os = other.platform.os;
        }
        if other.platform.arch.is_some() {
            self.platform.arch = other.platform.arch;
        }
        if other.platform.compiler.is_some() {
            self.platform.compiler = other.platform.compiler;
        }

        self.options.extend(other.options);
    }

    /// Platform settings from config, falling back to the host.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match self.platform.os {
            Some(ref os) => Settings::new(os.clone()),
            None => Settings::host(),
        };

        if let Some(ref arch) = self.platform.arch {
            settings = settings.with_arch(arch.clone());
        }
        if let Some(ref compiler) = self.platform.compiler {
            settings = settings.with_compiler(compiler.clone());
        }
        if let Some(ref build_type) = self.build.build_type {
            let build_type: BuildType = build_type.parse()?;
            settings = settings.with_build_type(build_type);
        }

        Ok(settings)
    }

    /// Build profile from config.
    pub fn build_profile(&self) -> Result<BuildProfile, ResolveError> {
        let mut profile = BuildProfile::default();
        if let Some(ref name) = self.build.archive_format {
            let format: ArchiveFormat = name.parse()?;
            profile = profile.with_archive_format(format);
        }
        for (key, value) in &self.options {
            profile = profile.with_option(OptionOverride::parse(key, value.clone())?);
        }
        Ok(profile)
    }

    /// Output directory, resolved against `project_root`.
    pub fn output_dir(&self, project_root: &Path) -> PathBuf {
        let dir = self
            .build
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        if dir.is_absolute() {
            dir
        } else {
            project_root.join(dir)
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.carimbo/config.toml)
/// 2. Global config (~/.carimbo/config.toml)
/// 3. Defaults
///
/// Missing files are skipped; a file that exists but does not parse is an
/// error.
pub fn load_config(global_path: &Path, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    for path in [global_path, project_path] {
        if path.exists() {
            tracing::debug!("loading config {}", path.display());
            config.merge(Config::load(path)?);
        }
    }

    Ok(config)
}

/// Get the global config directory (~/.carimbo).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".carimbo"))
}
