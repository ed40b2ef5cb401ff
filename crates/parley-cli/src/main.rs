//! `parley` -- interactive prompt for talking to agents.
//!
//! Provides the following subcommands:
//!
//! - `parley chat` -- Start an interactive session or send a single message.
//! - `parley prompts` -- Print the prompt catalog from the configured servers.
//! - `parley agents` -- List the configured agents.

use clap::{Parser, Subcommand};

mod backend;
mod commands;
mod terminal;

/// parley interactive agent prompt.
#[derive(Parser)]
#[command(name = "parley", about = "parley interactive agent prompt", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session or send a single message.
    Chat(commands::chat::ChatArgs),

    /// Print the prompt catalog.
    Prompts(commands::listing::ListingArgs),

    /// List the configured agents.
    Agents(commands::listing::ListingArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs share the terminal with the session, so keep them on stderr and
    // quiet unless asked for.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat(args) => commands::chat::run(args).await?,
        Commands::Prompts(args) => commands::listing::prompts(args).await?,
        Commands::Agents(args) => commands::listing::agents(args).await?,
    }

    Ok(())
}
