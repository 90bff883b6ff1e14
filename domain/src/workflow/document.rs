//! Exported workflow wiring for the graph consumer.
//!
//! Field names follow the consumer's JSON contract.

use crate::agent::records::{GraphAgentConfig, GraphLlmConfig};
use crate::tool::ToolDefinition;
use serde::{Deserialize, Serialize};

/// Non-LLM proxy that starts the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: ProxyInner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyInner {
    pub name: String,
    pub human_input_mode: String,
    pub max_consecutive_auto_reply: u32,
    pub system_message: String,
    /// Always `false`: the proxy never calls a model
    pub llm_config: bool,
    pub code_execution_config: CodeExecutionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExecutionConfig {
    pub work_dir: Option<String>,
    pub use_docker: bool,
}

/// Group-chat manager that owns the agent list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: ManagerInner,
    pub groupchat_config: GroupChatConfig,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerInner {
    pub name: String,
    pub llm_config: GraphLlmConfig,
    pub human_input_mode: String,
    pub system_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupChatConfig {
    /// Roster agents in roster order
    pub agents: Vec<GraphAgentConfig>,
    pub admin_name: String,
    pub messages: Vec<serde_json::Value>,
    pub max_round: u32,
    pub speaker_selection_method: String,
    pub allow_repeat_speaker: bool,
}

/// The complete workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub description: String,
    pub sender: SenderConfig,
    pub receiver: ReceiverConfig,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub summary_method: String,
}

impl WorkflowDocument {
    /// Agents wired into the group chat
    pub fn agents(&self) -> &[GraphAgentConfig] {
        &self.receiver.groupchat_config.agents
    }
}

/// Skill record exported next to the graph agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDocument {
    pub title: String,
    pub description: String,
    pub content: String,
    pub file_name: String,
}

impl From<&ToolDefinition> for SkillDocument {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            title: tool.name.clone(),
            description: tool.description.clone(),
            content: tool.content.clone(),
            file_name: format!("{}.py", tool.name),
        }
    }
}
