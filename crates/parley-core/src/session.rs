//! Interactive session controller.
//!
//! [`InteractivePrompt::run_session`] owns the current-agent cursor. Each
//! cycle it pauses the progress display, reads one line, routes it through
//! the [`Dispatcher`] and either handles it locally or forwards it to the
//! [`MessageSender`]. Typing `STOP` returns the last reply to the caller.

use tracing::{debug, info, warn};

use parley_types::{AgentTypes, Result, SessionError};

use crate::capability::{LineRequest, MessageSender, PromptApplier, PromptLister, Terminal, Tone};
use crate::catalog::show_catalog;
use crate::dispatch::{Command, Dispatcher};
use crate::display::ProgressDisplay;
use crate::interactive::SlashCommandRegistry;
use crate::wizard::{select_and_apply, select_by_index};

/// Sentinel that ends the session (compared case-insensitively).
pub const STOP: &str = "STOP";

/// Pick the agent a session starts with.
///
/// An empty `default_agent` falls back to the first available agent. A
/// non-empty one must be in `available`.
pub fn resolve_start_agent(default_agent: &str, available: &[String]) -> Result<String> {
    if default_agent.is_empty() {
        return available
            .first()
            .cloned()
            .ok_or_else(|| SessionError::Configuration {
                reason: "no default agent available".into(),
            });
    }
    if !available.iter().any(|a| a == default_agent) {
        return Err(SessionError::Configuration {
            reason: format!("no agent named '{default_agent}'"),
        });
    }
    Ok(default_agent.to_string())
}

/// Mutable state of one running session.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionState {
    current_agent: String,
    last_result: String,
}

/// Interactive prompt bound to a terminal.
pub struct InteractivePrompt<'t> {
    terminal: &'t dyn Terminal,
    display: ProgressDisplay,
    agent_types: AgentTypes,
    registry: SlashCommandRegistry,
}

impl<'t> InteractivePrompt<'t> {
    /// Create a prompt with the built-in commands and a hidden display.
    pub fn new(terminal: &'t dyn Terminal) -> Self {
        Self {
            terminal,
            display: ProgressDisplay::hidden(),
            agent_types: AgentTypes::new(),
            registry: SlashCommandRegistry::with_builtins(),
        }
    }

    /// Attach agent type metadata for display.
    pub fn with_agent_types(mut self, agent_types: AgentTypes) -> Self {
        self.agent_types = agent_types;
        self
    }

    /// Use `display` as the ambient progress display.
    pub fn with_display(mut self, display: ProgressDisplay) -> Self {
        self.display = display;
        self
    }

    /// Run the read-eval loop until `STOP`.
    ///
    /// Returns the last value produced by `send` (empty if it was never
    /// called). Fails before reading any input when the agent setup is
    /// unusable, and whenever `send` fails. `/exit` ends the session with
    /// [`SessionError::ExitRequested`].
    pub async fn run_session(
        &self,
        send: &dyn MessageSender,
        default_agent: &str,
        available_agents: &[String],
        apply: Option<&dyn PromptApplier>,
        list: Option<&dyn PromptLister>,
        initial_text: &str,
    ) -> Result<String> {
        let mut state = SessionState {
            current_agent: resolve_start_agent(default_agent, available_agents)?,
            last_result: String::new(),
        };
        info!(
            agent = %state.current_agent,
            agents = available_agents.len(),
            "interactive session started"
        );

        let dispatcher = Dispatcher::new(
            &self.registry,
            self.terminal,
            available_agents,
            &self.agent_types,
        )
        .with_prompt_capabilities(list.is_some(), apply.is_some());
        let mut default_input = initial_text.to_string();

        loop {
            let message = {
                let _quiet = self.display.pause();
                let request = LineRequest {
                    agent: &state.current_agent,
                    default: &default_input,
                    show_default: !default_input.is_empty(),
                    show_stop_hint: true,
                    multiline: false,
                    available_agents,
                    agent_types: &self.agent_types,
                };
                let line = match self.terminal.read_line(&request).await {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("input closed, stopping session");
                        return Ok(state.last_result);
                    }
                    Err(e) => {
                        warn!(error = %e, "input failed, stopping session");
                        return Ok(state.last_result);
                    }
                };
                if !line.trim().is_empty() {
                    default_input.clear();
                }

                match dispatcher.interpret_line(&line) {
                    Command::Plain(text) => {
                        if text.eq_ignore_ascii_case(STOP) {
                            info!("session stopped");
                            return Ok(state.last_result);
                        }
                        if text.trim().is_empty() {
                            continue;
                        }
                        text
                    }
                    Command::SwitchAgent(name) => {
                        if available_agents.contains(&name) {
                            info!(from = %state.current_agent, to = %name, "switched agent");
                            state.current_agent = name;
                        } else {
                            self.terminal
                                .emit(Tone::Error, &format!("Agent '{name}' not found"));
                        }
                        continue;
                    }
                    Command::ListPrompts => {
                        if let Some(list) = list {
                            show_catalog(list, self.terminal, &state.current_agent).await;
                        }
                        continue;
                    }
                    Command::SelectPrompt { name, index } => {
                        if let (Some(list), Some(apply)) = (list, apply) {
                            let agent = &state.current_agent;
                            match index {
                                Some(index) => {
                                    select_by_index(list, apply, self.terminal, agent, index)
                                        .await
                                }
                                None => {
                                    select_and_apply(
                                        list,
                                        apply,
                                        self.terminal,
                                        agent,
                                        name.as_deref(),
                                    )
                                    .await
                                }
                            }
                        }
                        continue;
                    }
                    Command::Handled => continue,
                    Command::Stop => {
                        info!("session stopped");
                        return Ok(state.last_result);
                    }
                    Command::Exit => return Err(SessionError::ExitRequested),
                }
            };

            self.display
                .set_status(format!("{} is responding...", state.current_agent));
            let reply = send.send(&message, &state.current_agent).await;
            self.display.clear_status();
            state.last_result = reply.map_err(SessionError::Send)?;
        }
    }
}
