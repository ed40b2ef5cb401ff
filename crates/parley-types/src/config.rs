//! Configuration schema.
//!
//! Both `snake_case` and `camelCase` keys are accepted: the loader runs
//! [`normalize_keys`] over the raw JSON before deserializing. Unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::{AgentType, AgentTypes};
use crate::prompt::PromptListings;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Agent selected when the session starts. Empty = first agent.
    #[serde(default)]
    pub default_agent: String,

    /// Agents the operator may address.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,

    /// Text pre-filled in the first input line.
    #[serde(default)]
    pub initial_text: String,

    /// Prompt servers served from this file, keyed by server name.
    #[serde(default)]
    pub prompt_servers: PromptListings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_agent: String::new(),
            agents: default_agents(),
            initial_text: String::new(),
            prompt_servers: PromptListings::new(),
        }
    }
}

impl Config {
    /// Agent names in declaration order.
    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name.clone()).collect()
    }

    /// Display metadata for every configured agent.
    pub fn agent_types(&self) -> AgentTypes {
        self.agents
            .iter()
            .map(|a| (a.name.clone(), a.agent_type))
            .collect()
    }
}

/// One addressable agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name, as typed after `@`.
    pub name: String,

    /// Display type.
    #[serde(default, rename = "type", alias = "agent_type")]
    pub agent_type: AgentType,
}

fn default_agents() -> Vec<AgentConfig> {
    vec![AgentConfig {
        name: "default".into(),
        agent_type: AgentType::Basic,
    }]
}

/// Convert camelCase JSON keys to snake_case recursively.
///
/// Keys under `prompt_servers` name servers and prompts, so that subtree
/// keeps its server names verbatim while still normalizing the field names
/// inside each listing.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, val) in map {
                let key = camel_to_snake(&key);
                let val = if key == "prompt_servers" {
                    normalize_server_map(val)
                } else {
                    normalize_keys(val)
                };
                out.insert(key, val);
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

fn normalize_server_map(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(server, listing)| (server, normalize_keys(listing)))
                .collect(),
        ),
        other => normalize_keys(other),
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of capitals is kept together, so `"HTMLParser"` becomes
/// `"html_parser"`.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}
