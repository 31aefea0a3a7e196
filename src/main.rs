//! merge-pin CLI

mod cli;

use clap::{Parser, Subcommand};
use merge_pin::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-pin")]
#[command(version)]
#[command(about = "Pinned Telegram merge plan for labeled GitHub pull requests")]
struct Cli {
    /// Path to the config file (default: <config dir>/merge-pin/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: daily post, periodic updates, chat commands
    Run,

    /// Fetch the plan once and print the message text that would be sent
    Preview,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cli::run::run_bot(config).await?,
        Commands::Preview => cli::preview::run_preview(&config).await?,
    }

    Ok(())
}
