use anyhow::Result;

use crate::console::TerminalConsole;
use crate::context::AppContext;
use crate::prompts::{print_success, print_warning};

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut manager = ctx.manager();
    let mut console = TerminalConsole::new();

    match manager.interactive_select(&mut console).await? {
        Some(descriptor) => {
            manager.set_default(descriptor.key)?;
            print_success(&format!("Set {} as default provider", descriptor.name))?;
        }
        None => print_warning("No provider selected")?,
    }
    Ok(())
}
