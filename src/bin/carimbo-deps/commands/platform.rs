//! `carimbo-deps platform` command

use anyhow::Result;

use crate::cli::PlatformCmdArgs;
use carimbo_deps::core::capability::Capability;
use carimbo_deps::util::GlobalContext;

pub fn execute(args: PlatformCmdArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = super::load_config(&ctx, &args.platform)?;
    let settings = config.settings()?;
    let profile = settings.profile();

    if args.json {
        let value = serde_json::json!({
            "settings": settings,
            "capabilities": profile.capabilities(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("platform: {}", settings);
    for cap in Capability::ALL {
        let mark = if profile.has(cap) { "yes" } else { "no" };
        println!("  {:<20} {}", cap.as_str(), mark);
    }

    Ok(())
}
