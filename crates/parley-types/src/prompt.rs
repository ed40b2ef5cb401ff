//! Prompt catalog types.
//!
//! Prompt servers report their prompts in one of two shapes (see
//! [`ServerPrompts`]). The catalog resolver in `parley-core` flattens both
//! into [`PromptDescriptor`] records, which are the only shape the rest of
//! the session ever sees.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Separator between server name and prompt name in a namespaced name.
pub const SEP: &str = "::";

/// Description used when a server does not supply one.
pub const NO_DESCRIPTION: &str = "No description";

/// Build the namespaced identity `"{server}{SEP}{name}"`.
pub fn namespaced_name(server: &str, name: &str) -> String {
    format!("{server}{SEP}{name}")
}

// ── Raw listing shapes ───────────────────────────────────────────────────

/// A prompt argument as reported by a prompt server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name. Blank names are ignored during normalization.
    #[serde(default)]
    pub name: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether a value must be supplied (missing = optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A prompt in the structured listing shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Prompt name, unique within its server.
    pub name: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared arguments.
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,

    /// Message template with `{{arg}}` placeholders (config-backed servers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Prompt {
    /// Create a prompt with no description and no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            template: None,
        }
    }
}

/// The prompts one server exposes, in either accepted shape.
///
/// `Structured` mirrors a `prompts/list` result (`{"prompts": [...]}`).
/// `Loose` is a bare JSON array whose entries are either prompt-like
/// objects carrying a `name` field or arbitrary values that get stringified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerPrompts {
    /// Object exposing a `prompts` list.
    Structured {
        /// The server's prompts.
        prompts: Vec<Prompt>,
    },
    /// Bare sequence of entries.
    Loose(Vec<serde_json::Value>),
}

/// Listing result keyed by server name.
pub type PromptListings = BTreeMap<String, ServerPrompts>;

// ── Normalized descriptor ────────────────────────────────────────────────

/// Canonical description of one prompt on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDescriptor {
    /// Server that exposes the prompt.
    pub server: String,

    /// Prompt name (may collide across servers).
    pub name: String,

    /// `server + SEP + name`; the stable identity used to apply a prompt.
    pub namespaced_name: String,

    /// Description, [`NO_DESCRIPTION`] when absent.
    pub description: String,

    /// Required argument names, in declaration order.
    pub required_args: Vec<String>,

    /// Optional argument names, in declaration order.
    pub optional_args: Vec<String>,

    /// Argument name to description.
    pub arg_descriptions: HashMap<String, String>,
}

impl PromptDescriptor {
    /// Create a descriptor with no arguments.
    pub fn new(server: impl Into<String>, name: impl Into<String>) -> Self {
        let server = server.into();
        let name = name.into();
        Self {
            namespaced_name: namespaced_name(&server, &name),
            server,
            name,
            description: NO_DESCRIPTION.to_string(),
            required_args: Vec::new(),
            optional_args: Vec::new(),
            arg_descriptions: HashMap::new(),
        }
    }

    /// Total number of declared arguments.
    pub fn arg_count(&self) -> usize {
        self.required_args.len() + self.optional_args.len()
    }

    /// Whether `requested` names this prompt, either bare or namespaced.
    pub fn matches(&self, requested: &str) -> bool {
        self.name == requested || self.namespaced_name == requested
    }

    /// Compact argument summary for catalog tables.
    ///
    /// `"2+1"` = two required plus one optional, `"2"` = required only,
    /// `"1 opt"` = optional only, `"0"` = none.
    pub fn args_summary(&self) -> String {
        let required = self.required_args.len();
        let optional = self.optional_args.len();
        match (required, optional) {
            (0, 0) => "0".to_string(),
            (r, 0) => r.to_string(),
            (0, o) => format!("{o} opt"),
            (r, o) => format!("{r}+{o}"),
        }
    }
}
