//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// carimbo-deps - Platform-conditional dependencies for the Carimbo engine
#[derive(Parser)]
#[command(name = "carimbo-deps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the capabilities of a target platform
    Platform(PlatformCmdArgs),

    /// Resolve dependencies and package options for a platform
    Resolve(ResolveArgs),

    /// Show the capability define flags for a platform
    Flags(FlagsArgs),

    /// Write the license manifest for installed packages
    Licenses(GenerateArgs),

    /// Write the toolchain description and the license manifest
    Generate(GenerateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Target platform selection, shared by every resolving command.
///
/// Unset values fall back to `.carimbo/config.toml`, then
/// `~/.carimbo/config.toml`, then the host.
#[derive(Args, Clone, Default)]
pub struct PlatformArgs {
    /// Target operating system (e.g. linux, windows, macos, emscripten)
    #[arg(long, env = "CARIMBO_OS")]
    pub os: Option<String>,

    /// Target architecture
    #[arg(long, env = "CARIMBO_ARCH")]
    pub arch: Option<String>,

    /// Compiler identity, passed through to the toolchain description
    #[arg(long)]
    pub compiler: Option<String>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Container format to enable in physfs (zip, 7z, grp, ...)
    #[arg(long)]
    pub archive_format: Option<String>,
}

#[derive(Args)]
pub struct PlatformCmdArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Output the full resolution plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Only show preprocessor definitions
    #[arg(long, conflicts_with = "cache")]
    pub preprocessor: bool,

    /// Only show build-cache variables
    #[arg(long)]
    pub cache: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Installed packages reported by the package installer (TOML or JSON)
    #[arg(long, value_name = "FILE")]
    pub installed: PathBuf,

    /// Directory to write artifacts into (defaults to `build/`)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
