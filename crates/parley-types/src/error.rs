//! Error types for the parley session.
//!
//! [`SessionError`] is what `run_session` hands back to its caller. Only
//! fatal conditions live here: user input mistakes are reported inline and
//! prompt-tooling failures are contained inside the wizard, so neither ever
//! reaches this type.

use thiserror::Error;

/// Errors that end an interactive session.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    /// No usable default agent; raised before the first prompt.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// What is wrong with the agent setup.
        reason: String,
    },

    /// The message-send capability failed.
    #[error("send failed: {0}")]
    Send(#[source] anyhow::Error),

    /// The operator asked to leave the program (`/exit`).
    #[error("user requested exit")]
    ExitRequested,
}

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for session results.
pub type Result<T> = std::result::Result<T, SessionError>;
