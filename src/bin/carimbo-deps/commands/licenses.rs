//! `carimbo-deps licenses` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use carimbo_deps::core::installed::InstalledSet;
use carimbo_deps::ops::generate_licenses;
use carimbo_deps::util::{DiskTree, GlobalContext};

pub fn execute(args: GenerateArgs, color: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = super::load_config(&ctx, &args.platform)?;
    let plan = super::plan(&config)?;
    let installed = InstalledSet::load(&args.installed)?;
    let output_dir = super::output_dir(&ctx, &config, args.output_dir.as_deref());

    let result = generate_licenses(&DiskTree, &plan, &installed, &output_dir)?;
    super::report_warnings(&result.warnings, &args.installed, color);

    eprintln!(
        "   Generated {} ({} packages)",
        result.licenses.display(),
        result.contributors.len()
    );

    Ok(())
}
