//! Capabilities the session consumes.
//!
//! The session never talks to a transport, a prompt server or a terminal
//! directly. Everything outside the core is reached through these traits,
//! which the binary implements over stdin/stdout and config-backed
//! servers, and which tests implement with scripted fakes.

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;

use parley_types::{AgentTypes, PromptDescriptor, PromptListings};

/// Delivers a message to an agent and returns its reply.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to `agent`.
    async fn send(&self, text: &str, agent: &str) -> anyhow::Result<String>;
}

/// Enumerates prompts exposed by prompt servers.
#[async_trait]
pub trait PromptLister: Send + Sync {
    /// List prompts, optionally restricted to one server (`None` = all).
    ///
    /// `Ok(None)` means the backend has nothing to report.
    async fn list_prompts(&self, server: Option<&str>) -> anyhow::Result<Option<PromptListings>>;
}

/// Applies a prompt to an agent.
#[async_trait]
pub trait PromptApplier: Send + Sync {
    /// Apply the prompt identified by `namespaced_name` with `args`.
    async fn apply_prompt(
        &self,
        namespaced_name: &str,
        args: HashMap<String, String>,
        agent: &str,
    ) -> anyhow::Result<()>;
}

/// How a line of terminal output should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Regular output.
    Normal,
    /// Section heading.
    Heading,
    /// Something the operator should notice; nothing failed.
    Warning,
    /// An operation failed.
    Error,
    /// Low-priority detail such as an error trace.
    Detail,
}

/// Parameters for the main input line.
#[derive(Debug, Clone)]
pub struct LineRequest<'a> {
    /// Agent the input is addressed to (shown in the prompt).
    pub agent: &'a str,
    /// Text returned when the operator just presses Enter.
    pub default: &'a str,
    /// Whether to display the default next to the prompt.
    pub show_default: bool,
    /// Whether to remind the operator that `STOP` ends the session.
    pub show_stop_hint: bool,
    /// Start in multiline mode.
    pub multiline: bool,
    /// Agents available for `@name` switching (for completion).
    pub available_agents: &'a [String],
    /// Agent display metadata.
    pub agent_types: &'a AgentTypes,
}

/// Parameters for a numeric selection.
#[derive(Debug, Clone)]
pub struct SelectionRequest<'a> {
    /// Prompt text.
    pub prompt: &'a str,
    /// Accepted values; empty = free text.
    pub options: &'a [String],
    /// Value used when the operator just presses Enter.
    pub default: Option<&'a str>,
    /// Whether blank input cancels the selection.
    pub allow_cancel: bool,
}

/// Parameters for one prompt argument.
#[derive(Debug, Clone)]
pub struct ArgumentRequest<'a> {
    /// Argument name.
    pub name: &'a str,
    /// Argument description, if the server supplied one.
    pub description: Option<&'a str>,
    /// Whether the argument must be supplied.
    pub required: bool,
}

/// Terminal input and rendering.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Read one line of session input. `Ok(None)` = end of input.
    async fn read_line(&self, request: &LineRequest<'_>) -> io::Result<Option<String>>;

    /// Read a selection. `Ok(None)` = cancelled.
    async fn read_selection(&self, request: &SelectionRequest<'_>) -> io::Result<Option<String>>;

    /// Read one argument value. `Ok(None)` = skipped or cancelled.
    async fn read_argument(&self, request: &ArgumentRequest<'_>) -> io::Result<Option<String>>;

    /// Print one line of output.
    fn emit(&self, tone: Tone, text: &str);

    /// Render a numbered catalog table (numbering starts at 1).
    fn render_catalog(&self, title: &str, catalog: &[PromptDescriptor]);

    /// Clear the screen.
    fn clear(&self);
}
