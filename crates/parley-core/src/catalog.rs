//! Prompt catalog resolution.
//!
//! Queries the listing capability across all servers and flattens the
//! result into a sorted `Vec<PromptDescriptor>`. Both listing shapes
//! ([`ServerPrompts::Structured`] and [`ServerPrompts::Loose`]) go through
//! [`normalize_server`], so nothing downstream sees the difference.
//!
//! The catalog is rebuilt on every request; nothing is cached.

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, warn};

use parley_types::prompt::{NO_DESCRIPTION, Prompt, PromptArgument};
use parley_types::{PromptDescriptor, PromptListings, ServerPrompts};

use crate::capability::{PromptLister, Terminal, Tone};

/// Title of the catalog table.
pub const CATALOG_TITLE: &str = "Available Prompts";

/// Fetch and normalize the catalog, propagating listing failures.
///
/// Always lists across all servers: the listing capability is scoped by
/// server, never by agent.
pub async fn try_fetch_catalog(lister: &dyn PromptLister) -> anyhow::Result<Vec<PromptDescriptor>> {
    let listings = lister
        .list_prompts(None)
        .await
        .context("listing prompts")?;
    Ok(listings.map(normalize_listings).unwrap_or_default())
}

/// Fetch and normalize the catalog. Failures are reported and yield an
/// empty catalog.
pub async fn fetch_catalog(
    lister: &dyn PromptLister,
    terminal: &dyn Terminal,
) -> Vec<PromptDescriptor> {
    match try_fetch_catalog(lister).await {
        Ok(catalog) => {
            debug!(prompts = catalog.len(), "prompt catalog fetched");
            catalog
        }
        Err(e) => {
            report_failure(terminal, "Error getting prompts", &e);
            Vec::new()
        }
    }
}

/// Print the catalog table with usage hints.
pub async fn show_catalog(lister: &dyn PromptLister, terminal: &dyn Terminal, agent: &str) {
    terminal.emit(
        Tone::Heading,
        &format!("Fetching prompts for agent {agent}..."),
    );
    let catalog = fetch_catalog(lister, terminal).await;
    if catalog.is_empty() {
        terminal.emit(Tone::Warning, "No prompts available");
        return;
    }

    terminal.render_catalog(CATALOG_TITLE, &catalog);
    terminal.emit(Tone::Heading, "Usage:");
    terminal.emit(
        Tone::Normal,
        "  - Use /prompt <number> to select a prompt by number",
    );
    terminal.emit(
        Tone::Normal,
        "  - Or use /prompts to open the prompt selection UI",
    );
}

/// Flatten every server's listing into one sorted catalog.
pub fn normalize_listings(listings: PromptListings) -> Vec<PromptDescriptor> {
    let mut catalog: Vec<PromptDescriptor> = listings
        .into_iter()
        .flat_map(|(server, prompts)| normalize_server(&server, prompts))
        .collect();
    sort_catalog(&mut catalog);
    catalog
}

/// Normalize one server's listing, in listing order.
pub fn normalize_server(server: &str, prompts: ServerPrompts) -> Vec<PromptDescriptor> {
    match prompts {
        ServerPrompts::Structured { prompts } => prompts
            .into_iter()
            .map(|prompt| from_prompt(server, prompt))
            .collect(),
        ServerPrompts::Loose(entries) => entries
            .into_iter()
            .map(|entry| from_loose_entry(server, entry))
            .collect(),
    }
}

/// Sort by (server, name). Stable, so re-sorting is a no-op.
pub fn sort_catalog(catalog: &mut [PromptDescriptor]) {
    catalog.sort_by(|a, b| (&a.server, &a.name).cmp(&(&b.server, &b.name)));
}

/// Report a collaborator failure: message first, then the cause chain.
pub(crate) fn report_failure(terminal: &dyn Terminal, context: &str, error: &anyhow::Error) {
    warn!(error = %format!("{error:#}"), "{context}");
    terminal.emit(Tone::Error, &format!("{context}: {error:#}"));
    terminal.emit(Tone::Detail, &format!("{error:?}"));
}

fn from_prompt(server: &str, prompt: Prompt) -> PromptDescriptor {
    describe(server, prompt.name, prompt.description, &prompt.arguments)
}

fn from_loose_entry(server: &str, entry: Value) -> PromptDescriptor {
    if let Value::Object(map) = &entry
        && let Some(name) = map.get("name")
    {
        let name = value_text(name);
        let description = map.get("description").and_then(|d| match d {
            Value::Null => None,
            other => Some(value_text(other)),
        });
        let arguments: Vec<PromptArgument> = map
            .get("arguments")
            .and_then(Value::as_array)
            .map(|args| {
                args.iter()
                    .filter_map(|arg| match serde_json::from_value(arg.clone()) {
                        Ok(argument) => Some(argument),
                        Err(e) => {
                            warn!(
                                server,
                                prompt = %name,
                                argument = %arg,
                                error = %e,
                                "dropping malformed prompt argument"
                            );
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        return describe(server, name, description, &arguments);
    }

    PromptDescriptor::new(server, value_text(&entry))
}

fn describe(
    server: &str,
    name: String,
    description: Option<String>,
    arguments: &[PromptArgument],
) -> PromptDescriptor {
    let mut descriptor = PromptDescriptor::new(server, name);
    descriptor.description = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    for arg in arguments {
        if arg.name.trim().is_empty() {
            continue;
        }
        if let Some(text) = arg.description.as_deref().filter(|d| !d.is_empty()) {
            descriptor
                .arg_descriptions
                .insert(arg.name.clone(), text.to_string());
        }
        if arg.required.unwrap_or(false) {
            descriptor.required_args.push(arg.name.clone());
        } else {
            descriptor.optional_args.push(arg.name.clone());
        }
    }
    descriptor
}

/// Display text for a JSON value: strings verbatim, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLister, ScriptedTerminal};
    use serde_json::json;

    fn names(catalog: &[PromptDescriptor]) -> Vec<&str> {
        catalog.iter().map(|p| p.namespaced_name.as_str()).collect()
    }

    #[test]
    fn structured_prompts_split_arguments() {
        let listing: ServerPrompts = serde_json::from_value(json!({
            "prompts": [{
                "name": "summarize",
                "description": "Summarize a document",
                "arguments": [
                    {"name": "doc", "description": "Document text", "required": true},
                    {"name": "length"},
                    {"name": "style", "required": false, "description": ""},
                    {"name": "  ", "description": "ignored", "required": true}
                ]
            }]
        }))
        .unwrap();

        let catalog = normalize_server("docs", listing);
        assert_eq!(catalog.len(), 1);
        let p = &catalog[0];
        assert_eq!(p.namespaced_name, "docs::summarize");
        assert_eq!(p.description, "Summarize a document");
        assert_eq!(p.required_args, vec!["doc"]);
        assert_eq!(p.optional_args, vec!["length", "style"]);
        assert_eq!(p.arg_descriptions.len(), 1);
        assert_eq!(p.arg_descriptions["doc"], "Document text");
    }

    #[test]
    fn missing_description_gets_default() {
        let catalog = normalize_server(
            "s",
            ServerPrompts::Structured {
                prompts: vec![Prompt::new("bare")],
            },
        );
        assert_eq!(catalog[0].description, NO_DESCRIPTION);
        assert_eq!(catalog[0].arg_count(), 0);
    }

    #[test]
    fn loose_entries_with_name_map_field_by_field() {
        let catalog = normalize_server(
            "loose",
            ServerPrompts::Loose(vec![json!({
                "name": "greet",
                "arguments": [{"name": "who", "required": true}]
            })]),
        );
        let p = &catalog[0];
        assert_eq!(p.name, "greet");
        assert_eq!(p.description, NO_DESCRIPTION);
        assert_eq!(p.required_args, vec!["who"]);
    }

    #[test]
    fn malformed_loose_arguments_are_dropped() {
        let catalog = normalize_server(
            "loose",
            ServerPrompts::Loose(vec![json!({
                "name": "review",
                "arguments": [
                    {"name": "doc", "required": true},
                    {"name": "bad", "required": "true"},
                    "not-an-object"
                ]
            })]),
        );
        let p = &catalog[0];
        assert_eq!(p.required_args, vec!["doc"]);
        assert!(p.optional_args.is_empty());
        assert_eq!(p.arg_count(), 1);
    }

    #[test]
    fn loose_entries_without_name_are_stringified() {
        let catalog = normalize_server(
            "loose",
            ServerPrompts::Loose(vec![json!("plain-prompt"), json!(42), json!({"title": "x"})]),
        );
        assert_eq!(catalog[0].name, "plain-prompt");
        assert_eq!(catalog[0].namespaced_name, "loose::plain-prompt");
        assert_eq!(catalog[1].name, "42");
        assert_eq!(catalog[2].name, r#"{"title":"x"}"#);
        assert!(catalog.iter().all(|p| p.arg_count() == 0));
        assert!(catalog.iter().all(|p| p.description == NO_DESCRIPTION));
    }

    #[test]
    fn catalog_sorted_by_server_then_name() {
        let listings: PromptListings = serde_json::from_value(json!({
            "zeta": {"prompts": [{"name": "b"}, {"name": "a"}]},
            "alpha": ["y", "x"]
        }))
        .unwrap();
        let catalog = normalize_listings(listings);
        assert_eq!(
            names(&catalog),
            vec!["alpha::x", "alpha::y", "zeta::a", "zeta::b"]
        );
    }

    #[test]
    fn sorting_a_sorted_catalog_is_idempotent() {
        let listings: PromptListings = serde_json::from_value(json!({
            "b": ["two", "one"],
            "a": {"prompts": [{"name": "z"}, {"name": "m"}]}
        }))
        .unwrap();
        let catalog = normalize_listings(listings);
        let mut resorted = catalog.clone();
        sort_catalog(&mut resorted);
        assert_eq!(catalog, resorted);
    }

    #[test]
    fn duplicate_names_across_servers_stay_distinct() {
        let listings: PromptListings = serde_json::from_value(json!({
            "svc2": ["greet"],
            "svc1": ["greet"]
        }))
        .unwrap();
        let catalog = normalize_listings(listings);
        assert_eq!(names(&catalog), vec!["svc1::greet", "svc2::greet"]);
        assert_ne!(catalog[0], catalog[1]);
    }

    #[tokio::test]
    async fn fetch_lists_across_all_servers() {
        let lister = FakeLister::from_json(json!({"svc": ["p"]}));
        let term = ScriptedTerminal::default();
        let catalog = fetch_catalog(&lister, &term).await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(*lister.filters.lock(), vec![None]);
    }

    #[tokio::test]
    async fn fetch_with_nothing_reported_is_empty() {
        let lister = FakeLister::empty();
        let term = ScriptedTerminal::default();
        assert!(fetch_catalog(&lister, &term).await.is_empty());
        assert_eq!(term.error_count(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_not_raised() {
        let lister = FakeLister::failing("server offline");
        let term = ScriptedTerminal::default();
        let catalog = fetch_catalog(&lister, &term).await;
        assert!(catalog.is_empty());
        assert!(term.printed_error("Error getting prompts"));
        assert!(term.printed_error("server offline"));
        assert!(
            term.output
                .lock()
                .iter()
                .any(|(tone, _)| *tone == Tone::Detail)
        );
    }

    #[tokio::test]
    async fn show_catalog_renders_table_and_usage() {
        let lister = FakeLister::from_json(json!({"svc": ["b", "a"]}));
        let term = ScriptedTerminal::default();
        show_catalog(&lister, &term, "writer").await;
        assert!(term.printed("Fetching prompts for agent writer"));
        assert_eq!(*term.tables.lock(), vec![vec!["svc::a", "svc::b"]]);
        assert!(term.printed("/prompt <number>"));
        assert!(term.printed("Or use /prompts to open the prompt selection UI"));
    }

    #[tokio::test]
    async fn show_catalog_reports_empty() {
        let lister = FakeLister::from_json(json!({}));
        let term = ScriptedTerminal::default();
        show_catalog(&lister, &term, "writer").await;
        assert!(term.printed("No prompts available"));
        assert!(term.tables.lock().is_empty());
    }
}
