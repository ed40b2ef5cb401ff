//! # parley-types
//!
//! Core type definitions for the parley interactive agent prompt.
//!
//! - **[`agent`]** -- [`AgentType`] display metadata
//! - **[`prompt`]** -- raw prompt listings and the normalized [`PromptDescriptor`]
//! - **[`config`]** -- configuration schema
//! - **[`error`]** -- [`SessionError`] and [`ConfigError`]

pub mod agent;
pub mod config;
pub mod error;
pub mod prompt;

pub use agent::{AgentType, AgentTypes};
pub use error::{ConfigError, Result, SessionError};
pub use prompt::{PromptDescriptor, PromptListings, SEP, ServerPrompts};
