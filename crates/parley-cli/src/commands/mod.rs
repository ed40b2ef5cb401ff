//! CLI command implementations for `parley`.
//!
//! - [`chat`] -- interactive session or single-message mode.
//! - [`listing`] -- `parley prompts` and `parley agents`.

pub mod chat;
pub mod listing;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use parley_types::ConfigError;
use parley_types::config::{Config, normalize_keys};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PARLEY_CONFIG";

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, loads from that path and fails when it
/// does not exist. Otherwise the discovery chain is:
/// 1. `PARLEY_CONFIG` env var
/// 2. `~/.parley/config.json`
///
/// Returns a default `Config` when discovery finds nothing.
pub async fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let path = match config_override {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                return Err(ConfigError::NotFound(path_str.to_string()).into());
            }
            Some(path)
        }
        None => discover_config_path(std::env::var(CONFIG_ENV).ok(), dirs::home_dir()),
    };

    let Some(path) = path.filter(|p| p.exists()) else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };
    read_config(&path).await
}

/// Discover the config file path.
///
/// An explicit `env_path` wins even if the file is missing; the home
/// directory candidate is only returned when it exists.
pub fn discover_config_path(env_path: Option<String>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(env_path) = env_path.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(env_path));
    }
    let candidate = home_dir?.join(".parley").join("config.json");
    candidate.exists().then_some(candidate)
}

async fn read_config(path: &Path) -> anyhow::Result<Config> {
    debug!(path = %path.display(), "loading config");
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(ConfigError::from)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(ConfigError::from)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    let config = serde_json::from_value(normalize_keys(value))
        .map_err(ConfigError::from)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
