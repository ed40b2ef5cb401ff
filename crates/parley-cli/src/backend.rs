//! Local backends for the `parley` binary.
//!
//! [`EchoSender`] stands in for an agent transport and [`ConfigPromptServers`]
//! serves the prompt servers declared in the config file. Applying a
//! config prompt renders its template and sends the result to the agent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use parley_core::catalog::normalize_server;
use parley_core::{MessageSender, PromptApplier, PromptLister};
use parley_types::{PromptDescriptor, PromptListings, SEP, ServerPrompts};

/// Sender that answers every message with `"[agent] text"` and prints it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoSender;

#[async_trait]
impl MessageSender for EchoSender {
    async fn send(&self, text: &str, agent: &str) -> anyhow::Result<String> {
        let reply = format!("[{agent}] {text}");
        println!("{reply}");
        Ok(reply)
    }
}

/// Prompt servers defined in the config file.
pub struct ConfigPromptServers {
    servers: PromptListings,
    sender: Arc<dyn MessageSender>,
}

impl ConfigPromptServers {
    pub fn new(servers: PromptListings, sender: Arc<dyn MessageSender>) -> Self {
        Self { servers, sender }
    }

    /// Find a prompt by namespaced name, with its template if it has one.
    fn lookup(&self, namespaced_name: &str) -> Option<(PromptDescriptor, Option<String>)> {
        let (server, name) = namespaced_name.split_once(SEP)?;
        let listing = self.servers.get(server)?;
        let templates = templates(listing);
        normalize_server(server, listing.clone())
            .into_iter()
            .zip(templates)
            .find(|(descriptor, _)| descriptor.name == name)
    }
}

#[async_trait]
impl PromptLister for ConfigPromptServers {
    async fn list_prompts(&self, server: Option<&str>) -> anyhow::Result<Option<PromptListings>> {
        let listings: PromptListings = match server {
            Some(server) => self
                .servers
                .iter()
                .filter(|(name, _)| name.as_str() == server)
                .map(|(name, prompts)| (name.clone(), prompts.clone()))
                .collect(),
            None => self.servers.clone(),
        };
        Ok((!listings.is_empty()).then_some(listings))
    }
}

#[async_trait]
impl PromptApplier for ConfigPromptServers {
    async fn apply_prompt(
        &self,
        namespaced_name: &str,
        args: HashMap<String, String>,
        agent: &str,
    ) -> anyhow::Result<()> {
        let Some((prompt, template)) = self.lookup(namespaced_name) else {
            anyhow::bail!("prompt '{namespaced_name}' not found");
        };
        if let Some(missing) = prompt
            .required_args
            .iter()
            .find(|name| args.get(*name).is_none_or(|v| v.is_empty()))
        {
            anyhow::bail!("missing required argument '{missing}' for prompt {namespaced_name}");
        }

        let template = template.unwrap_or_else(|| prompt.name.clone());
        let message = render_template(&template, &prompt, &args);
        debug!(prompt = %namespaced_name, agent, "sending rendered prompt");
        self.sender.send(&message, agent).await?;
        Ok(())
    }
}

/// Templates of a listing's entries, aligned with `normalize_server`.
fn templates(listing: &ServerPrompts) -> Vec<Option<String>> {
    match listing {
        ServerPrompts::Structured { prompts } => {
            prompts.iter().map(|p| p.template.clone()).collect()
        }
        ServerPrompts::Loose(entries) => entries
            .iter()
            .map(|entry| {
                entry
                    .get("template")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect(),
    }
}

/// Substitute `{{arg}}` placeholders. Declared arguments without a value
/// render as empty text; unknown placeholders are left alone.
pub fn render_template(
    template: &str,
    prompt: &PromptDescriptor,
    args: &HashMap<String, String>,
) -> String {
    let mut out = template.to_string();
    for name in prompt.required_args.iter().chain(&prompt.optional_args) {
        let value = args.get(name).map(String::as_str).unwrap_or_default();
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}
