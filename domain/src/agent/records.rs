//! Export shapes produced by the agent record builder.
//!
//! Two consumers read agent definitions:
//!
//! - the *graph* consumer (group-chat workflow runner) wants a typed envelope
//!   with a nested `llm_config` block and a `system_message`;
//! - the *crew* consumer wants a flat record with `verbose` /
//!   `allow_delegation` flags.
//!
//! Field names are the consumers' contracts and are kept verbatim.

use serde::{Deserialize, Serialize};

/// One entry of a graph `config_list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphModelEntry {
    pub model: String,
    pub api_type: String,
}

/// Nested LLM configuration block of a graph agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLlmConfig {
    pub config_list: Vec<GraphModelEntry>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub timeout: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_seed: Option<u64>,
}

/// Inner `config` object of a graph agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAgentInner {
    pub name: String,
    pub llm_config: GraphLlmConfig,
    pub human_input_mode: String,
    pub max_consecutive_auto_reply: u32,
    pub system_message: String,
}

/// Agent definition for the graph/workflow consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAgentConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: GraphAgentInner,
    pub description: String,
    /// Capability references (tool names)
    pub tools: Vec<String>,
}

/// Agent definition for the crew consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewAgentConfig {
    pub name: String,
    pub description: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    pub allow_delegation: bool,
    pub tools: Vec<String>,
    /// `provider/model`
    pub llm: String,
    pub temperature: f32,
}
