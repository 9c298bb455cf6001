//! Command implementations

pub mod completions;
pub mod flags;
pub mod generate;
pub mod licenses;
pub mod platform;
pub mod resolve;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::PlatformArgs;
use carimbo_deps::core::platform::Settings;
use carimbo_deps::ops::{resolve_platform, ResolutionPlan};
use carimbo_deps::util::config::PlatformConfig;
use carimbo_deps::util::diagnostic::{emit, Diagnostic};
use carimbo_deps::util::{Config, GlobalContext};

/// Configuration with command-line values layered on top.
pub fn load_config(ctx: &GlobalContext, args: &PlatformArgs) -> Result<Config> {
    let mut config = ctx.load_config()?;

    let mut cli = Config {
        platform: PlatformConfig {
            os: args.os.clone(),
            arch: args.arch.clone(),
            compiler: args.compiler.clone(),
        },
        ..Config::default()
    };
    cli.build.build_type = args.build_type.clone();
    cli.build.archive_format = args.archive_format.clone();

    config.merge(cli);
    Ok(config)
}

/// Resolve the plan for the selected platform.
pub fn plan(config: &Config) -> Result<ResolutionPlan> {
    let settings: Settings = config.settings()?;
    let build = config.build_profile()?;
    Ok(resolve_platform(&settings, &build)?)
}

/// Report non-fatal findings against the installed-packages file.
pub fn report_warnings(warnings: &[String], installed: &Path, color: bool) {
    for warning in warnings {
        emit(&Diagnostic::warning(warning.clone()).with_location(installed), color);
    }
}

/// Output directory: the flag, else the configured one.
pub fn output_dir(ctx: &GlobalContext, config: &Config, flag: Option<&Path>) -> PathBuf {
    match flag {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => ctx.cwd().join(dir),
        None => config.output_dir(&ctx.project_root()),
    }
}
