//! Built-in slash commands.
//!
//! - `/help` -- show available commands
//! - `/clear` -- clear the screen
//! - `/agents` -- list available agents
//! - `/prompts` -- list and select prompts (same as bare `/prompt`)
//! - `/prompt [name|number]` -- select and apply a prompt
//! - `/stop` -- end the session
//! - `/exit` -- leave the program

use super::registry::{ParsedInput, SlashCommand, SlashCommandRegistry};

/// Register all built-in slash commands into the given registry.
pub fn register_builtins(registry: &mut SlashCommandRegistry) {
    registry.register(Box::new(HelpCommand));
    registry.register(Box::new(ClearCommand));
    registry.register(Box::new(AgentsCommand));
    registry.register(Box::new(PromptsCommand));
    registry.register(Box::new(PromptCommand));
    registry.register(Box::new(StopCommand));
    registry.register(Box::new(ExitCommand));
}

/// Declares a built-in whose parse result ignores its arguments.
macro_rules! fixed_command {
    ($ty:ident, $name:literal, $usage:literal, $desc:literal, $parsed:expr) => {
        #[doc = concat!("`", $usage, "` -- ", $desc, ".")]
        struct $ty;

        impl SlashCommand for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn usage(&self) -> &str {
                $usage
            }

            fn description(&self) -> &str {
                $desc
            }

            fn parse(&self, _args: &str) -> ParsedInput {
                $parsed
            }
        }
    };
}

fixed_command!(HelpCommand, "help", "/help", "Show this help", ParsedInput::Help);
fixed_command!(ClearCommand, "clear", "/clear", "Clear the screen", ParsedInput::Clear);
fixed_command!(
    AgentsCommand,
    "agents",
    "/agents",
    "List available agents",
    ParsedInput::ListAgents
);
fixed_command!(
    PromptsCommand,
    "prompts",
    "/prompts",
    "List and select MCP prompts",
    ParsedInput::SelectPrompt {
        name: None,
        index: None
    }
);
fixed_command!(
    StopCommand,
    "stop",
    "/stop",
    "Return control to the caller",
    ParsedInput::Stop
);
fixed_command!(ExitCommand, "exit", "/exit", "Exit the program", ParsedInput::Exit);

// ── /prompt ───────────────────────────────────────────────────────────────

/// `/prompt [name|number]` -- select and apply a prompt.
///
/// A bare number selects by catalog position, anything else by name. With
/// no argument the interactive picker opens.
struct PromptCommand;

impl SlashCommand for PromptCommand {
    fn name(&self) -> &str {
        "prompt"
    }

    fn usage(&self) -> &str {
        "/prompt <name|number>"
    }

    fn description(&self) -> &str {
        "Select and apply a prompt"
    }

    fn parse(&self, args: &str) -> ParsedInput {
        let arg = args.trim();
        if arg.is_empty() {
            return ParsedInput::SelectPrompt {
                name: None,
                index: None,
            };
        }
        if arg.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = arg.parse::<usize>()
        {
            return ParsedInput::SelectPrompt {
                name: None,
                index: Some(index),
            };
        }
        ParsedInput::SelectPrompt {
            name: Some(arg.to_string()),
            index: None,
        }
    }
}

/// Format the help text for every registered command.
pub fn format_help(registry: &SlashCommandRegistry) -> String {
    let mut output = String::from("Available commands:\n");
    for name in registry.names() {
        if let Some(cmd) = registry.get(name) {
            output.push_str(&format!("  {:<22} -- {}\n", cmd.usage(), cmd.description()));
        }
    }
    output.push_str(&format!("  {:<22} -- {}\n", "@agent_name", "Switch to agent"));
    output.push_str(&format!(
        "  {:<22} -- {}\n",
        "STOP", "Return control back to the caller"
    ));
    output.push_str(&format!("  {:<22} -- {}", "EXIT", "Exit the program"));
    output
}
