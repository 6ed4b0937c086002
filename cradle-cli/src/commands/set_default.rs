use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::prompts::{print_success, print_warning};

#[derive(Args, Debug)]
pub struct SetDefaultArgs {
    /// Provider key, e.g. "ollama"
    pub provider: String,
}

pub fn run(ctx: &AppContext, args: SetDefaultArgs) -> Result<()> {
    let descriptor = ctx.require(&args.provider)?;
    let mut manager = ctx.manager();

    let configured = manager.checker().check_configured(descriptor.key);
    if !configured.ok {
        print_warning(&format!("{}: {}", descriptor.name, configured))?;
    }

    manager.set_default(descriptor.key)?;
    print_success(&format!("Set {} as default provider", descriptor.name))?;
    Ok(())
}
