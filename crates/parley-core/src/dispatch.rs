//! Special command dispatch.
//!
//! Maps a parsed input line onto a [`Command`] for the session controller.
//! Commands that need nothing from the session (help, clear, agent listing,
//! unknown slash commands) are executed here and come back as
//! [`Command::Handled`]. A structured command never becomes
//! [`Command::Plain`], so it can never be forwarded to an agent.

use tracing::debug;

use parley_types::AgentTypes;

use crate::capability::{Terminal, Tone};
use crate::interactive::builtins::format_help;
use crate::interactive::{ParsedInput, SlashCommandRegistry};

/// What the session should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward the text to the current agent.
    Plain(String),
    /// Make `name` the current agent.
    SwitchAgent(String),
    /// Show the prompt catalog.
    ListPrompts,
    /// Run the prompt wizard.
    SelectPrompt {
        /// Requested prompt name, bare or namespaced.
        name: Option<String>,
        /// Requested 1-based catalog position.
        index: Option<usize>,
    },
    /// Fully handled; nothing further to do.
    Handled,
    /// End the session, returning the last result.
    Stop,
    /// Abort the session and leave the program.
    Exit,
}

/// Interprets input lines against the session's capabilities.
pub struct Dispatcher<'a> {
    registry: &'a SlashCommandRegistry,
    terminal: &'a dyn Terminal,
    agents: &'a [String],
    agent_types: &'a AgentTypes,
    can_list: bool,
    can_apply: bool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher.
    ///
    /// `can_list` / `can_apply` record whether the session was given a
    /// prompt-listing / prompt-applying capability.
    pub fn new(
        registry: &'a SlashCommandRegistry,
        terminal: &'a dyn Terminal,
        agents: &'a [String],
        agent_types: &'a AgentTypes,
    ) -> Self {
        Self {
            registry,
            terminal,
            agents,
            agent_types,
            can_list: false,
            can_apply: false,
        }
    }

    /// Declare which prompt capabilities are available.
    pub fn with_prompt_capabilities(mut self, can_list: bool, can_apply: bool) -> Self {
        self.can_list = can_list;
        self.can_apply = can_apply;
        self
    }

    /// Parse and interpret one raw line.
    pub fn interpret_line(&self, raw: &str) -> Command {
        self.interpret(self.registry.parse(raw))
    }

    /// Interpret a parsed line.
    ///
    /// Prompt intents whose capability is missing are dropped silently
    /// (returned as [`Command::Handled`]).
    pub fn interpret(&self, parsed: ParsedInput) -> Command {
        match parsed {
            ParsedInput::Text(text) => Command::Plain(text),
            ParsedInput::SwitchAgent(name) => Command::SwitchAgent(name),
            ParsedInput::ListPrompts => {
                if self.can_list {
                    Command::ListPrompts
                } else {
                    debug!("prompt listing unavailable, ignoring catalog request");
                    Command::Handled
                }
            }
            ParsedInput::SelectPrompt { name, index } => {
                if self.can_list && self.can_apply {
                    Command::SelectPrompt { name, index }
                } else {
                    debug!("prompt selection unavailable, ignoring /prompt or /prompts");
                    Command::Handled
                }
            }
            ParsedInput::Help => {
                self.terminal.emit(Tone::Normal, &format_help(self.registry));
                Command::Handled
            }
            ParsedInput::Clear => {
                self.terminal.clear();
                Command::Handled
            }
            ParsedInput::ListAgents => {
                self.list_agents();
                Command::Handled
            }
            ParsedInput::Unknown(name) => {
                self.terminal.emit(
                    Tone::Warning,
                    &format!("Unknown command: /{name} (type /help for commands)"),
                );
                Command::Handled
            }
            ParsedInput::Stop => Command::Stop,
            ParsedInput::Exit => Command::Exit,
        }
    }

    fn list_agents(&self) {
        if self.agents.is_empty() {
            self.terminal.emit(Tone::Warning, "No agents available");
            return;
        }
        let mut sorted: Vec<&String> = self.agents.iter().collect();
        sorted.sort();

        self.terminal.emit(Tone::Heading, "Available agents:");
        for name in sorted {
            let kind = self.agent_types.get(name);
            self.terminal.emit(Tone::Normal, &format!("  @{name} ({kind})"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTerminal;
    use parley_types::AgentType;

    struct Fixture {
        registry: SlashCommandRegistry,
        terminal: ScriptedTerminal,
        agents: Vec<String>,
        types: AgentTypes,
    }

    impl Fixture {
        fn new() -> Self {
            let mut types = AgentTypes::new();
            types.insert("b", AgentType::Router);
            Self {
                registry: SlashCommandRegistry::with_builtins(),
                terminal: ScriptedTerminal::default(),
                agents: vec!["b".into(), "a".into()],
                types,
            }
        }

        fn dispatcher(&self, can_list: bool, can_apply: bool) -> Dispatcher<'_> {
            Dispatcher::new(&self.registry, &self.terminal, &self.agents, &self.types)
                .with_prompt_capabilities(can_list, can_apply)
        }
    }

    #[test]
    fn plain_text_passes_through() {
        let f = Fixture::new();
        assert_eq!(
            f.dispatcher(true, true).interpret_line("hello"),
            Command::Plain("hello".into())
        );
    }

    #[test]
    fn agent_switch_is_forwarded_even_if_unknown() {
        let f = Fixture::new();
        let d = f.dispatcher(false, false);
        assert_eq!(d.interpret_line("@a"), Command::SwitchAgent("a".into()));
        assert_eq!(d.interpret_line("@zzz"), Command::SwitchAgent("zzz".into()));
    }

    #[test]
    fn list_prompts_requires_lister() {
        let f = Fixture::new();
        assert_eq!(
            f.dispatcher(true, false).interpret(ParsedInput::ListPrompts),
            Command::ListPrompts
        );
        assert_eq!(
            f.dispatcher(false, true).interpret(ParsedInput::ListPrompts),
            Command::Handled
        );
    }

    #[test]
    fn prompts_command_opens_picker() {
        let f = Fixture::new();
        assert_eq!(
            f.dispatcher(true, true).interpret_line("/prompts"),
            Command::SelectPrompt {
                name: None,
                index: None
            }
        );
        assert_eq!(
            f.dispatcher(true, false).interpret_line("/prompts"),
            Command::Handled
        );
    }

    #[test]
    fn select_prompt_requires_both_capabilities() {
        let f = Fixture::new();
        assert_eq!(
            f.dispatcher(true, true).interpret_line("/prompt 2"),
            Command::SelectPrompt {
                name: None,
                index: Some(2)
            }
        );
        assert_eq!(
            f.dispatcher(true, false).interpret_line("/prompt greet"),
            Command::Handled
        );
        assert_eq!(
            f.dispatcher(false, true).interpret_line("/prompt"),
            Command::Handled
        );
    }

    #[test]
    fn help_is_handled_locally() {
        let f = Fixture::new();
        assert_eq!(f.dispatcher(true, true).interpret_line("/help"), Command::Handled);
        assert!(f.terminal.printed("/prompt <name|number>"));
    }

    #[test]
    fn clear_is_handled_locally() {
        let f = Fixture::new();
        assert_eq!(f.dispatcher(true, true).interpret_line("/clear"), Command::Handled);
        assert_eq!(*f.terminal.clears.lock(), 1);
    }

    #[test]
    fn agents_listed_sorted_with_types() {
        let f = Fixture::new();
        assert_eq!(f.dispatcher(true, true).interpret_line("/agents"), Command::Handled);
        let lines: Vec<String> = f
            .terminal
            .output
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        assert_eq!(
            lines,
            vec!["Available agents:", "  @a (unknown)", "  @b (router)"]
        );
    }

    #[test]
    fn unknown_slash_command_never_becomes_plain() {
        let f = Fixture::new();
        assert_eq!(f.dispatcher(true, true).interpret_line("/frobnicate"), Command::Handled);
        assert!(f.terminal.printed("Unknown command: /frobnicate"));
    }

    #[test]
    fn stop_and_exit() {
        let f = Fixture::new();
        let d = f.dispatcher(true, true);
        assert_eq!(d.interpret_line("/stop"), Command::Stop);
        assert_eq!(d.interpret_line("/exit"), Command::Exit);
        assert_eq!(d.interpret_line("EXIT"), Command::Exit);
    }
}
