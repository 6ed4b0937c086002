use anyhow::{Result, bail};
use clap::Args;
use cradle_providers::{Error, ProviderManager};
use tracing::warn;

use crate::console::TerminalConsole;
use crate::context::AppContext;
use crate::prompts::{print_success, print_warning};

#[derive(Args, Debug)]
pub struct ConfigureEndpointArgs {
    /// Local provider key: ollama, lmstudio or vllm
    pub provider: String,
}

pub async fn run(ctx: &AppContext, args: ConfigureEndpointArgs) -> Result<()> {
    let descriptor = ctx.require(&args.provider)?;
    if !descriptor.is_local() {
        let local: Vec<_> = ctx
            .registry()
            .iter()
            .filter(|d| d.is_local())
            .map(|d| d.key)
            .collect();
        bail!("Can only configure local providers: {}", local.join(", "));
    }

    let mut console = TerminalConsole::new();
    let runtime = match ctx.configurator().configure(descriptor.key, &mut console).await {
        Ok(runtime) => runtime,
        Err(Error::Cancelled) => bail!("Configuration cancelled"),
        Err(e) => return Err(e.into()),
    };

    println!();
    print_success(&format!("Saved {}", ctx.store().display_path(descriptor).display()))?;
    println!("  base_url:   {}", runtime.base_url);
    println!("  comp_model: {}", runtime.comp_model);

    if let Some(problem) = note_configured(&mut ctx.manager(), descriptor.key) {
        print_warning(&problem)?;
    }

    println!();
    println!("Test with: cradle check {}", descriptor.key);
    Ok(())
}

/// Add `key` to the configured set. The endpoint file is already written,
/// so a failure is returned as a message instead of an error.
fn note_configured(manager: &mut ProviderManager<'_>, key: &str) -> Option<String> {
    match manager.record_configured(key) {
        Ok(_) => None,
        Err(e) => {
            let path = manager.preferences().path().display().to_string();
            warn!(provider = key, path = %path, error = %e, "could not record configured provider");
            Some(format!("Endpoint saved, but {path} was not updated: {e}"))
        }
    }
}
