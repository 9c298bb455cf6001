//! `carimbo-deps resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use carimbo_deps::util::GlobalContext;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = super::load_config(&ctx, &args.platform)?;
    let plan = super::plan(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", plan.summary());
    }

    Ok(())
}
