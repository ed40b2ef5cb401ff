//! Slash-command parsing for the interactive session.
//!
//! Provides a [`SlashCommandRegistry`](registry::SlashCommandRegistry) that
//! turns raw input lines into [`ParsedInput`](registry::ParsedInput)
//! intents, plus the built-in command set.

pub mod builtins;
pub mod registry;

pub use registry::{ParsedInput, SlashCommand, SlashCommandRegistry};
