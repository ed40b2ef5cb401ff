//! Agent identity and display metadata.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of agent, used only for display next to its name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// A single agent with its own instruction.
    #[serde(alias = "agent")]
    Basic,
    /// Plans and delegates to other agents.
    Orchestrator,
    /// Fans a message out to several agents.
    Parallel,
    /// Generator/evaluator refinement loop.
    EvaluatorOptimizer,
    /// Picks one agent per message.
    Router,
    /// Runs agents in sequence.
    Chain,
    /// No type information available.
    #[default]
    Unknown,
}

impl AgentType {
    /// Short tag shown in agent listings.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Basic => "agent",
            Self::Orchestrator => "orchestrator",
            Self::Parallel => "parallel",
            Self::EvaluatorOptimizer => "evaluator_optimizer",
            Self::Router => "router",
            Self::Chain => "chain",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Agent name to type. Absent entries read as [`AgentType::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentTypes(HashMap<String, AgentType>);

impl AgentTypes {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of an agent.
    pub fn insert(&mut self, name: impl Into<String>, kind: AgentType) {
        self.0.insert(name.into(), kind);
    }

    /// Look up an agent's type.
    pub fn get(&self, name: &str) -> AgentType {
        self.0.get(name).copied().unwrap_or_default()
    }
}

impl FromIterator<(String, AgentType)> for AgentTypes {
    fn from_iter<I: IntoIterator<Item = (String, AgentType)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
