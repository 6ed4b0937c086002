use crate::config::ConfigLoader;
use crate::context::AppContext;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration file paths
    Path,
}

pub fn run(ctx: &AppContext, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Path => show_paths(ctx),
    }
}

fn show_config(ctx: &AppContext) -> Result<()> {
    let toml_str = toml::to_string_pretty(ctx.config())?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths(ctx: &AppContext) -> Result<()> {
    println!("User config:    {:?}", ConfigLoader::user_config_path());
    println!(
        "Project config: {:?}",
        ConfigLoader::project_config_path(ctx.root())
    );
    println!(
        "Preferences:    {:?}",
        ctx.root().join(&ctx.config().paths.preferences_file)
    );
    println!(
        "Provider files: {:?}",
        ctx.root().join(&ctx.config().paths.conf_dir)
    );
    Ok(())
}
