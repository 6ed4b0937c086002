use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::prompts::{print_success, print_warning};

#[derive(Args, Debug)]
pub struct EstimateCostArgs {
    /// Provider key
    pub provider: String,

    /// Number of tokens to price
    #[arg(default_value_t = 1000)]
    pub tokens: u64,
}

pub fn run(ctx: &AppContext, args: EstimateCostArgs) -> Result<()> {
    let descriptor = ctx.require(&args.provider)?;
    let estimate = ctx.manager().estimate_cost(descriptor.key, args.tokens)?;

    println!("Cost Estimate for {}", descriptor.name);
    println!("  {}", estimate.description);
    println!();
    if descriptor.is_local() {
        print_success("FREE - running locally!")?;
    } else {
        print_warning("This will cost real money")?;
    }
    Ok(())
}
