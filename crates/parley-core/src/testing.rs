//! Scripted fakes shared by the unit tests in this crate.

use std::collections::{HashMap, VecDeque};
use std::io;

use async_trait::async_trait;
use parking_lot::Mutex;

use parley_types::{PromptDescriptor, PromptListings};

use crate::capability::{
    ArgumentRequest, LineRequest, MessageSender, PromptApplier, PromptLister, SelectionRequest,
    Terminal, Tone,
};

/// Terminal that replays scripted input and records everything it shows.
///
/// Exhausted scripts behave like end of input (`Ok(None)`).
#[derive(Default)]
pub struct ScriptedTerminal {
    lines: Mutex<VecDeque<String>>,
    selections: Mutex<VecDeque<Option<String>>>,
    arguments: Mutex<VecDeque<Option<String>>>,
    pub output: Mutex<Vec<(Tone, String)>>,
    pub line_defaults: Mutex<Vec<(String, String)>>,
    pub selection_prompts: Mutex<Vec<(Vec<String>, Option<String>, bool)>>,
    pub argument_prompts: Mutex<Vec<(String, Option<String>, bool)>>,
    pub tables: Mutex<Vec<Vec<String>>>,
    pub clears: Mutex<usize>,
}

impl ScriptedTerminal {
    pub fn with_lines(lines: &[&str]) -> Self {
        let term = Self::default();
        term.lines
            .lock()
            .extend(lines.iter().map(|l| l.to_string()));
        term
    }

    pub fn push_selection(&self, value: Option<&str>) {
        self.selections.lock().push_back(value.map(str::to_string));
    }

    pub fn push_argument(&self, value: Option<&str>) {
        self.arguments.lock().push_back(value.map(str::to_string));
    }

    /// Whether any emitted line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.output.lock().iter().any(|(_, line)| line.contains(needle))
    }

    /// Whether an error-toned line contains `needle`.
    pub fn printed_error(&self, needle: &str) -> bool {
        self.output
            .lock()
            .iter()
            .any(|(tone, line)| *tone == Tone::Error && line.contains(needle))
    }

    pub fn error_count(&self) -> usize {
        self.output
            .lock()
            .iter()
            .filter(|(tone, _)| *tone == Tone::Error)
            .count()
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    async fn read_line(&self, request: &LineRequest<'_>) -> io::Result<Option<String>> {
        self.line_defaults
            .lock()
            .push((request.agent.to_string(), request.default.to_string()));
        Ok(self.lines.lock().pop_front())
    }

    async fn read_selection(&self, request: &SelectionRequest<'_>) -> io::Result<Option<String>> {
        self.selection_prompts.lock().push((
            request.options.to_vec(),
            request.default.map(str::to_string),
            request.allow_cancel,
        ));
        Ok(self.selections.lock().pop_front().flatten())
    }

    async fn read_argument(&self, request: &ArgumentRequest<'_>) -> io::Result<Option<String>> {
        self.argument_prompts.lock().push((
            request.name.to_string(),
            request.description.map(str::to_string),
            request.required,
        ));
        Ok(self.arguments.lock().pop_front().flatten())
    }

    fn emit(&self, tone: Tone, text: &str) {
        self.output.lock().push((tone, text.to_string()));
    }

    fn render_catalog(&self, _title: &str, catalog: &[PromptDescriptor]) {
        self.tables
            .lock()
            .push(catalog.iter().map(|p| p.namespaced_name.clone()).collect());
    }

    fn clear(&self) {
        *self.clears.lock() += 1;
    }
}

/// Sender that replays scripted replies and records every call.
#[derive(Default)]
pub struct FakeSender {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeSender {
    pub fn replying(replies: &[&str]) -> Self {
        let sender = Self::default();
        sender
            .replies
            .lock()
            .extend(replies.iter().map(|r| Ok(r.to_string())));
        sender
    }

    pub fn failing(message: &str) -> Self {
        let sender = Self::default();
        sender
            .replies
            .lock()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
        sender
    }
}

#[async_trait]
impl MessageSender for FakeSender {
    async fn send(&self, text: &str, agent: &str) -> anyhow::Result<String> {
        self.calls.lock().push((text.to_string(), agent.to_string()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Lister returning a fixed listing (or a fixed failure).
pub struct FakeLister {
    listings: Option<PromptListings>,
    error: Option<String>,
    pub filters: Mutex<Vec<Option<String>>>,
}

impl FakeLister {
    pub fn new(listings: PromptListings) -> Self {
        Self {
            listings: Some(listings),
            error: None,
            filters: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        Self::new(serde_json::from_value(value).expect("valid listing json"))
    }

    pub fn empty() -> Self {
        Self {
            listings: None,
            error: None,
            filters: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            listings: None,
            error: Some(message.to_string()),
            filters: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PromptLister for FakeLister {
    async fn list_prompts(&self, server: Option<&str>) -> anyhow::Result<Option<PromptListings>> {
        self.filters.lock().push(server.map(str::to_string));
        if let Some(message) = &self.error {
            anyhow::bail!("{message}");
        }
        Ok(self.listings.clone())
    }
}

/// Applier that records every application.
#[derive(Default)]
pub struct FakeApplier {
    error: Option<String>,
    pub calls: Mutex<Vec<(String, HashMap<String, String>, String)>>,
}

impl FakeApplier {
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PromptApplier for FakeApplier {
    async fn apply_prompt(
        &self,
        namespaced_name: &str,
        args: HashMap<String, String>,
        agent: &str,
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push((namespaced_name.to_string(), args, agent.to_string()));
        if let Some(message) = &self.error {
            anyhow::bail!("{message}");
        }
        Ok(())
    }
}
