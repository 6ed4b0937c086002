use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod console;
mod context;
mod prompts;

use context::AppContext;

#[derive(Parser)]
#[command(name = "cradle", about = "Choose and check the LLM providers Cradle runs on")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root holding conf/ and .env
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every provider and whether it is usable
    Status(commands::status::StatusArgs),
    /// Pick the default provider interactively
    Select,
    /// Check one provider in detail
    Check(commands::check::CheckArgs),
    /// Set the default provider
    SetDefault(commands::set_default::SetDefaultArgs),
    /// Estimate the cost of a token count
    EstimateCost(commands::estimate_cost::EstimateCostArgs),
    /// Point a local provider at a server and pick its model
    ConfigureEndpoint(commands::configure_endpoint::ConfigureEndpointArgs),
    /// Show the adapters a config reference resolves to
    Resolve(commands::resolve::ResolveArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let ctx = AppContext::load(cli.root)?;

    match cli.command.unwrap_or(Commands::Status(Default::default())) {
        Commands::Status(args) => commands::status::run(&ctx, args).await,
        Commands::Select => commands::select::run(&ctx).await,
        Commands::Check(args) => commands::check::run(&ctx, args).await,
        Commands::SetDefault(args) => commands::set_default::run(&ctx, args),
        Commands::EstimateCost(args) => commands::estimate_cost::run(&ctx, args),
        Commands::ConfigureEndpoint(args) => commands::configure_endpoint::run(&ctx, args).await,
        Commands::Resolve(args) => commands::resolve::run(&ctx, args).await,
        Commands::Config(args) => commands::config::run(&ctx, args),
    }
}
