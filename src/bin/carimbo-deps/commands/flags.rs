//! `carimbo-deps flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use carimbo_deps::core::define::DefineFlag;
use carimbo_deps::util::diagnostic::{emit, Diagnostic};
use carimbo_deps::util::GlobalContext;

pub fn execute(args: FlagsArgs, color: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = super::load_config(&ctx, &args.platform)?;
    let settings = config.settings()?;
    let profile = settings.profile();
    let flags = carimbo_deps::builder::ToolchainEmitter::new(&settings, &profile).flags();

    if flags.is_empty() {
        let note = Diagnostic::note(format!("no capability flags for `{}`", settings.os))
            .with_context(format!("capabilities: {}", profile));
        emit(&note, color);
        return Ok(());
    }

    if !args.cache {
        if !args.preprocessor {
            println!("# Preprocessor definitions for `{}`:", settings.os);
        }
        for (name, value) in &flags.preprocessor_definitions {
            println!("{}", DefineFlag::new(name.clone(), value.clone()).to_flag());
        }
    }

    if !args.cache && !args.preprocessor {
        println!();
    }

    if !args.preprocessor {
        if !args.cache {
            println!("# Cache variables for `{}`:", settings.os);
        }
        for (name, value) in &flags.cache_variables {
            println!("{}:{}={}", name, value.cache_type(), value.to_cache());
        }
    }

    Ok(())
}
