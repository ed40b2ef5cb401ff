//! # parley-core
//!
//! Interactive prompt engine for parley.
//!
//! - **[`session`]** -- the read-dispatch-send loop ([`InteractivePrompt`])
//! - **[`dispatch`]** -- maps input lines onto session [`Command`]s
//! - **[`interactive`]** -- slash command registry and built-in commands
//! - **[`catalog`]** -- flattens prompt listings into a sorted catalog
//! - **[`wizard`]** -- prompt selection, argument collection and application
//! - **[`capability`]** -- traits for the transport, prompt servers and terminal
//! - **[`display`]** -- pausable progress display

pub mod capability;
pub mod catalog;
pub mod dispatch;
pub mod display;
pub mod interactive;
pub mod session;
pub mod wizard;

#[cfg(test)]
mod testing;

pub use capability::{MessageSender, PromptApplier, PromptLister, Terminal, Tone};
pub use dispatch::{Command, Dispatcher};
pub use display::{PauseGuard, ProgressDisplay, StatusRenderer};
pub use session::{InteractivePrompt, resolve_start_agent};
