//! Slash command registry and line parsing.
//!
//! The [`SlashCommandRegistry`] holds a set of named [`SlashCommand`]
//! implementations and turns one raw input line into a [`ParsedInput`].
//! Parsing never has side effects; executing the parsed intent is the
//! dispatcher's job.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = SlashCommandRegistry::with_builtins();
//! assert_eq!(registry.parse("/prompt 2"), ParsedInput::SelectPrompt { name: None, index: Some(2) });
//! ```

use std::collections::HashMap;

/// Structured form of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// Ordinary text for the current agent.
    Text(String),
    /// `@name` -- address a different agent.
    SwitchAgent(String),
    /// Show the prompt catalog.
    ListPrompts,
    /// Run the prompt wizard, optionally for a specific prompt.
    SelectPrompt {
        /// Prompt requested by name (bare or namespaced).
        name: Option<String>,
        /// Prompt requested by 1-based catalog position.
        index: Option<usize>,
    },
    /// Show command help.
    Help,
    /// Clear the screen.
    Clear,
    /// List the available agents.
    ListAgents,
    /// End the session and return control to the caller.
    Stop,
    /// Leave the program entirely.
    Exit,
    /// A slash command nobody registered.
    Unknown(String),
}

/// Trait for a slash command.
///
/// Implementors provide a name (without the `/` prefix), a usage string and
/// description for help text, and a [`parse`](SlashCommand::parse) method
/// that maps the command's arguments onto a [`ParsedInput`].
pub trait SlashCommand: Send + Sync {
    /// Command name without the leading `/`, lowercase.
    fn name(&self) -> &str;

    /// Usage shown in help, e.g. `/prompt <name|number>`.
    fn usage(&self) -> &str;

    /// One-line description for help text.
    fn description(&self) -> &str;

    /// Interpret the (trimmed) argument string.
    fn parse(&self, args: &str) -> ParsedInput;
}

/// Registry of slash commands.
pub struct SlashCommandRegistry {
    commands: HashMap<String, Box<dyn SlashCommand>>,
}

impl SlashCommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in commands.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::register_builtins(&mut registry);
        registry
    }

    /// Register a slash command.
    ///
    /// If a command with the same name already exists, it is replaced.
    pub fn register(&mut self, cmd: Box<dyn SlashCommand>) {
        self.commands.insert(cmd.name().to_lowercase(), cmd);
    }

    /// Parse one line of input.
    ///
    /// - `/name args` is looked up case-insensitively; unknown names yield
    ///   [`ParsedInput::Unknown`].
    /// - `@agent` yields [`ParsedInput::SwitchAgent`].
    /// - `EXIT` in any case yields [`ParsedInput::Exit`].
    /// - Anything else is returned unchanged as [`ParsedInput::Text`].
    pub fn parse(&self, input: &str) -> ParsedInput {
        if let Some(without_slash) = input.strip_prefix('/') {
            let trimmed = without_slash.trim();
            let (name, args) = match trimmed.split_once(char::is_whitespace) {
                Some((n, a)) => (n, a.trim()),
                None => (trimmed, ""),
            };
            let name = name.to_lowercase();
            return match self.commands.get(&name) {
                Some(cmd) => cmd.parse(args),
                None => ParsedInput::Unknown(name),
            };
        }

        if let Some(agent) = input.strip_prefix('@') {
            return ParsedInput::SwitchAgent(agent.trim().to_string());
        }

        if input.trim().eq_ignore_ascii_case("exit") {
            return ParsedInput::Exit;
        }

        ParsedInput::Text(input.to_string())
    }

    /// List all registered command names (sorted).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Get a reference to a command by name.
    pub fn get(&self, name: &str) -> Option<&dyn SlashCommand> {
        self.commands.get(&name.to_lowercase()).map(|b| b.as_ref())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for SlashCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
