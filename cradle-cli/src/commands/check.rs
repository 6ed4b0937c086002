use anyhow::Result;
use clap::Args;
use cradle_providers::ProviderDescriptor;

use crate::context::AppContext;
use crate::prompts::{print_error, print_success};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Provider key
    pub provider: String,
}

pub async fn run(ctx: &AppContext, args: CheckArgs) -> Result<()> {
    let descriptor = ctx.require(&args.provider)?;
    let manager = ctx.manager();
    let outcome = manager.check(descriptor.key).await?;

    println!("Checking {}...", descriptor.name);
    if outcome.ok {
        print_success("Available")?;
    } else {
        print_error("Not available")?;
    }
    println!("  Status: {}", outcome);

    if !outcome.ok {
        println!();
        for line in guidance(descriptor, &ctx.checker().base_url(descriptor)) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Setup steps printed after a failed check.
fn guidance(descriptor: &ProviderDescriptor, base_url: &str) -> Vec<String> {
    if descriptor.requires_credential() {
        let vars = descriptor.credential_env.join(" and ");
        vec![
            "To configure:".to_string(),
            format!("  1. Get credentials for {}", descriptor.name),
            format!("  2. Add {vars} to .env file"),
        ]
    } else {
        vec![
            "To configure:".to_string(),
            format!("  1. Install {}", descriptor.name),
            "  2. Start the server".to_string(),
            format!("  3. Server should run at: {base_url}"),
        ]
    }
}
