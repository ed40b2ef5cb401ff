//! `parley prompts` and `parley agents` -- print what the config offers.

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};

use parley_core::catalog::{CATALOG_TITLE, normalize_listings};
use parley_types::config::Config;

use super::load_config;
use crate::terminal::catalog_table;

/// Arguments shared by the listing subcommands.
#[derive(Args)]
pub struct ListingArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Print the prompt catalog of the configured prompt servers.
pub async fn prompts(args: ListingArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let catalog = normalize_listings(config.prompt_servers);
    if catalog.is_empty() {
        println!("No prompts available");
        return Ok(());
    }
    println!("{CATALOG_TITLE}");
    println!("{}", catalog_table(&catalog));
    Ok(())
}

/// Print the configured agents.
pub async fn agents(args: ListingArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    println!("{}", agents_table(&config));
    Ok(())
}

fn agents_table(config: &Config) -> Table {
    let default = config
        .agents
        .iter()
        .find(|a| a.name == config.default_agent)
        .or_else(|| config.agents.first())
        .map(|a| a.name.as_str());

    let mut sorted: Vec<_> = config.agents.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Agent", "Type", "Default"]);
    for agent in sorted {
        let marker = if Some(agent.name.as_str()) == default { "*" } else { "" };
        table.add_row(vec![
            format!("@{}", agent.name),
            agent.agent_type.to_string(),
            marker.to_string(),
        ]);
    }
    table
}
