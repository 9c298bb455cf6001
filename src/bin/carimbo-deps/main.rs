//! carimbo-deps CLI

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use carimbo_deps::resolver::ResolveError;
use carimbo_deps::util::diagnostic::emit;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("carimbo_deps=debug")
    } else {
        EnvFilter::new("carimbo_deps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Platform(args) => commands::platform::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Flags(args) => commands::flags::execute(args, color),
        Commands::Licenses(args) => commands::licenses::execute(args, color),
        Commands::Generate(args) => commands::generate::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
