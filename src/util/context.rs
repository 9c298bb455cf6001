//! Global context for carimbo-deps operations.
//!
//! Provides centralized access to the working directory, the project root
//! and the configuration file locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_dir, load_config, Config};

/// Name of the per-project settings directory.
pub const PROJECT_DIR_NAME: &str = ".carimbo";

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global settings (~/.carimbo/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(PROJECT_DIR_NAME));

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with explicit directories.
    pub fn with_dirs(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext { cwd, home }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global config file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Find the project root: the nearest ancestor holding a `.carimbo`
    /// directory, or the working directory if there is none.
    pub fn project_root(&self) -> PathBuf {
        self.cwd
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR_NAME).is_dir())
            .unwrap_or(&self.cwd)
            .to_path_buf()
    }

    /// Get the project config file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_root()
            .join(PROJECT_DIR_NAME)
            .join("config.toml")
    }

    /// Load the merged global + project configuration.
    pub fn load_config(&self) -> Result<Config> {
        load_config(&self.config_path(), &self.project_config_path())
    }
}
