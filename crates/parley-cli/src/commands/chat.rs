//! `parley chat` -- interactive session or single-message mode.
//!
//! In single-message mode (`--message "..."`), sends one message to the
//! agent and prints the reply. Otherwise runs the interactive session on
//! stdin until `STOP`, `/exit` or end of input.
//!
//! # Examples
//!
//! ```text
//! # Single message
//! parley chat -m "hello"
//!
//! # Interactive mode
//! parley chat --agent writer
//! writer > hello
//! [writer] hello
//! writer > @critic
//! critic > STOP
//! ```

use std::sync::Arc;

use clap::Args;
use tracing::info;

use parley_core::session::resolve_start_agent;
use parley_core::{InteractivePrompt, MessageSender};
use parley_types::SessionError;

use super::load_config;
use crate::backend::{ConfigPromptServers, EchoSender};
use crate::terminal::{StdinTerminal, progress_display};

/// Arguments for the `parley chat` subcommand.
#[derive(Args)]
pub struct ChatArgs {
    /// Send a single message and exit (non-interactive mode).
    #[arg(short, long)]
    pub message: Option<String>,

    /// Agent to start with (overrides config).
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the `parley chat` command.
pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let agents = config.agent_names();
    let default_agent = args.agent.unwrap_or_else(|| config.default_agent.clone());
    let sender: Arc<dyn MessageSender> = Arc::new(EchoSender);

    if let Some(message) = args.message {
        let agent = resolve_start_agent(&default_agent, &agents)?;
        sender
            .send(&message, &agent)
            .await
            .map_err(SessionError::Send)?;
        return Ok(());
    }

    let servers = ConfigPromptServers::new(config.prompt_servers.clone(), sender.clone());
    let terminal = StdinTerminal::new();
    let prompt = InteractivePrompt::new(&terminal)
        .with_agent_types(config.agent_types())
        .with_display(progress_display());

    let outcome = prompt
        .run_session(
            sender.as_ref(),
            &default_agent,
            &agents,
            Some(&servers),
            Some(&servers),
            &config.initial_text,
        )
        .await;

    match outcome {
        Ok(last) => {
            info!(reply_len = last.len(), "session finished");
            Ok(())
        }
        Err(SessionError::ExitRequested) => {
            info!("exit requested");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
