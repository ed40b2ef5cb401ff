//! Prompt selection wizard.
//!
//! Resolves which prompt the operator means, collects its arguments and
//! applies it to the current agent. The wizard never fails its caller:
//! input mistakes are reported and abandon the selection, and collaborator
//! failures are reported with their cause chain.

use std::collections::HashMap;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use parley_types::PromptDescriptor;

use crate::capability::{
    ArgumentRequest, PromptApplier, PromptLister, SelectionRequest, Terminal, Tone,
};
use crate::catalog::{CATALOG_TITLE, fetch_catalog, report_failure, show_catalog, try_fetch_catalog};

/// Why a selection string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The input is not an integer.
    #[error("Invalid input, please enter a number")]
    NotANumber,
    /// The number is outside `1..=len`.
    #[error("Invalid selection")]
    OutOfRange,
}

/// Parse a 1-based selection against a list of `len` items, returning the
/// 0-based position.
pub fn parse_selection(input: &str, len: usize) -> Result<usize, SelectionError> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber)?;
    if n < 1 || n as u64 > len as u64 {
        return Err(SelectionError::OutOfRange);
    }
    Ok((n - 1) as usize)
}

/// Select a prompt (by name, or interactively when `requested` is `None`),
/// collect its arguments and apply it for `agent`.
pub async fn select_and_apply(
    lister: &dyn PromptLister,
    applier: &dyn PromptApplier,
    terminal: &dyn Terminal,
    agent: &str,
    requested: Option<&str>,
) {
    let requested = requested.filter(|name| !name.is_empty());
    if let Err(e) = run_wizard(lister, applier, terminal, agent, requested).await {
        report_failure(terminal, "Error selecting or applying prompt", &e);
    }
}

/// Apply the prompt at 1-based catalog position `index`.
///
/// An out-of-range position reports the valid range and shows the catalog.
pub async fn select_by_index(
    lister: &dyn PromptLister,
    applier: &dyn PromptApplier,
    terminal: &dyn Terminal,
    agent: &str,
    index: usize,
) {
    let catalog = fetch_catalog(lister, terminal).await;
    if catalog.is_empty() {
        terminal.emit(Tone::Warning, "No prompts available");
        return;
    }

    match index.checked_sub(1).and_then(|i| catalog.get(i)) {
        Some(prompt) => {
            select_and_apply(
                lister,
                applier,
                terminal,
                agent,
                Some(prompt.namespaced_name.as_str()),
            )
            .await;
        }
        None => {
            terminal.emit(
                Tone::Error,
                &format!(
                    "Invalid prompt number: {index}. Valid range is 1-{}",
                    catalog.len()
                ),
            );
            show_catalog(lister, terminal, agent).await;
        }
    }
}

async fn run_wizard(
    lister: &dyn PromptLister,
    applier: &dyn PromptApplier,
    terminal: &dyn Terminal,
    agent: &str,
    requested: Option<&str>,
) -> anyhow::Result<()> {
    terminal.emit(
        Tone::Heading,
        &format!("Fetching prompts for agent {agent}..."),
    );
    let catalog = try_fetch_catalog(lister).await?;
    if catalog.is_empty() {
        terminal.emit(Tone::Warning, "No prompts available for this agent");
        return Ok(());
    }

    let selected = match requested {
        Some(name) => resolve_by_name(terminal, &catalog, name).await?,
        None => pick_from_catalog(terminal, &catalog).await?,
    };
    let Some(prompt) = selected else {
        return Ok(());
    };

    let args = collect_arguments(terminal, prompt).await?;
    let namespaced = &prompt.namespaced_name;
    terminal.emit(Tone::Heading, &format!("Applying prompt {namespaced}..."));
    info!(prompt = %namespaced, agent, args = args.len(), "applying prompt");
    applier
        .apply_prompt(namespaced, args, agent)
        .await
        .with_context(|| format!("applying prompt {namespaced}"))
}

/// Resolve a requested name against the catalog. `Ok(None)` = abandoned
/// (not found or bad selection, already reported).
async fn resolve_by_name<'c>(
    terminal: &dyn Terminal,
    catalog: &'c [PromptDescriptor],
    requested: &str,
) -> anyhow::Result<Option<&'c PromptDescriptor>> {
    let matches: Vec<&PromptDescriptor> =
        catalog.iter().filter(|p| p.matches(requested)).collect();

    match matches.as_slice() {
        [] => {
            terminal.emit(Tone::Error, &format!("Prompt '{requested}' not found"));
            terminal.emit(Tone::Warning, "Available prompts:");
            for p in catalog {
                terminal.emit(Tone::Normal, &format!("  {}", p.namespaced_name));
            }
            Ok(None)
        }
        [only] => Ok(Some(*only)),
        several => {
            debug!(requested, matches = several.len(), "ambiguous prompt name");
            terminal.emit(
                Tone::Warning,
                &format!("Multiple prompts match '{requested}':"),
            );
            for (i, p) in several.iter().enumerate() {
                terminal.emit(
                    Tone::Normal,
                    &format!("  {}. {} - {}", i + 1, p.namespaced_name, p.description),
                );
            }

            let selection = terminal
                .read_selection(&SelectionRequest {
                    prompt: "Enter prompt number to select: ",
                    options: &[],
                    default: Some("1"),
                    allow_cancel: false,
                })
                .await
                .context("reading prompt selection")?
                .unwrap_or_default();

            match parse_selection(&selection, several.len()) {
                Ok(i) => Ok(Some(several[i])),
                Err(e) => {
                    terminal.emit(Tone::Error, &e.to_string());
                    Ok(None)
                }
            }
        }
    }
}

/// Show the whole catalog and let the operator pick one. `Ok(None)` =
/// cancelled or bad selection (already reported).
async fn pick_from_catalog<'c>(
    terminal: &dyn Terminal,
    catalog: &'c [PromptDescriptor],
) -> anyhow::Result<Option<&'c PromptDescriptor>> {
    terminal.render_catalog(CATALOG_TITLE, catalog);
    let options: Vec<String> = (1..=catalog.len()).map(|i| i.to_string()).collect();

    let selection = terminal
        .read_selection(&SelectionRequest {
            prompt: "Enter prompt number to select (or press Enter to cancel): ",
            options: &options,
            default: None,
            allow_cancel: true,
        })
        .await
        .context("reading prompt selection")?;

    let Some(selection) = selection.filter(|s| !s.trim().is_empty()) else {
        terminal.emit(Tone::Warning, "Prompt selection cancelled");
        return Ok(None);
    };

    match parse_selection(&selection, catalog.len()) {
        Ok(i) => Ok(Some(&catalog[i])),
        Err(e) => {
            terminal.emit(Tone::Error, &e.to_string());
            Ok(None)
        }
    }
}

/// Ask for every argument of `prompt`. Required values are always kept;
/// optional ones only when non-empty.
async fn collect_arguments(
    terminal: &dyn Terminal,
    prompt: &PromptDescriptor,
) -> anyhow::Result<HashMap<String, String>> {
    let required = &prompt.required_args;
    let optional = &prompt.optional_args;
    let mut values = HashMap::new();

    let summary = match (required.len(), optional.len()) {
        (0, 0) => return Ok(values),
        (r, 0) => format!("Prompt {} requires {r} arguments:", prompt.name),
        (0, o) => format!("Prompt {} has {o} optional arguments:", prompt.name),
        (r, o) => format!(
            "Prompt {} requires {r} arguments and has {o} optional arguments:",
            prompt.name
        ),
    };
    terminal.emit(Tone::Heading, &summary);

    for name in required {
        let value = read_argument(terminal, prompt, name, true).await?;
        if let Some(value) = value {
            values.insert(name.clone(), value);
        }
    }
    for name in optional {
        let value = read_argument(terminal, prompt, name, false).await?;
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            values.insert(name.clone(), value);
        }
    }
    Ok(values)
}

async fn read_argument(
    terminal: &dyn Terminal,
    prompt: &PromptDescriptor,
    name: &str,
    required: bool,
) -> anyhow::Result<Option<String>> {
    terminal
        .read_argument(&ArgumentRequest {
            name,
            description: prompt.arg_descriptions.get(name).map(String::as_str),
            required,
        })
        .await
        .with_context(|| format!("reading argument {name}"))
}
