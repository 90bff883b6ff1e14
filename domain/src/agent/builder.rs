//! Agent record builder.
//!
//! Turns an [`AgentDescriptor`] into an [`Agent`] and derives the graph and
//! crew export shapes from it. Pure transform: writing files and calling
//! LLMs belong to callers.

use super::entities::Agent;
use super::records::{
    CrewAgentConfig, GraphAgentConfig, GraphAgentInner, GraphLlmConfig, GraphModelEntry,
};
use super::roster::Roster;
use super::value_objects::{AgentDescriptor, display_name};
use crate::core::error::DomainError;
use crate::core::sanitize::sanitize;
use crate::providers::{LlmParams, ProviderKind};

/// Request timeout written into graph `llm_config` blocks, in seconds
pub const GRAPH_TIMEOUT_SECS: u32 = 600;
/// Cache seed written into graph `llm_config` blocks
pub const GRAPH_CACHE_SEED: u64 = 42;
/// Auto-reply cap written into graph agent configs
pub const GRAPH_MAX_AUTO_REPLY: u32 = 8;

/// Backend settings applied to every agent built from descriptors
#[derive(Debug, Clone, Default)]
pub struct AgentDefaults {
    pub provider: ProviderKind,
    pub model: String,
    pub params: LlmParams,
}

/// All representations of one agent
#[derive(Debug, Clone)]
pub struct AgentRecord {
    pub agent: Agent,
    pub graph: GraphAgentConfig,
    pub crew: CrewAgentConfig,
}

/// Builds agents from descriptors
#[derive(Debug, Clone, Default)]
pub struct AgentRecordBuilder {
    defaults: AgentDefaults,
}

impl AgentRecordBuilder {
    pub fn new(defaults: AgentDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &AgentDefaults {
        &self.defaults
    }

    /// Build the domain agent for one descriptor.
    ///
    /// Missing `role` becomes the display name; missing `goal`/`backstory`
    /// are filled from templates over the description.
    pub fn build_agent(&self, descriptor: &AgentDescriptor) -> Result<Agent, DomainError> {
        let name = display_name(&descriptor.expert_name);
        if name.is_empty() {
            return Err(DomainError::EmptyAgentName);
        }
        let description = sanitize(&descriptor.description).trim().to_string();

        let role = descriptor
            .role
            .as_deref()
            .map(sanitize)
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| name.clone());
        let goal = descriptor
            .goal
            .as_deref()
            .map(sanitize)
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| default_goal(&description));
        let backstory = descriptor
            .backstory
            .as_deref()
            .map(sanitize)
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| default_backstory(&role, &description));

        let tools = descriptor
            .skills
            .iter()
            .chain(descriptor.tools.iter())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Agent::new(
            &name,
            description,
            role,
            goal,
            backstory,
            tools,
            self.defaults.provider,
            self.defaults.model.clone(),
            self.defaults.params.clone(),
        ))
    }

    /// Build the agent and both export shapes.
    pub fn build(&self, descriptor: &AgentDescriptor) -> Result<AgentRecord, DomainError> {
        let agent = self.build_agent(descriptor)?;
        Ok(AgentRecord {
            graph: graph_config(&agent),
            crew: crew_config(&agent),
            agent,
        })
    }

    /// Build a roster from one parser pass, resolving name collisions.
    ///
    /// Descriptors whose name sanitizes to nothing are skipped; the returned
    /// diagnostics say which.
    pub fn build_roster(&self, descriptors: &[AgentDescriptor]) -> (Roster, Vec<String>) {
        let mut roster = Roster::new();
        let mut diagnostics = Vec::new();

        for descriptor in descriptors {
            match self.build_agent(descriptor) {
                Ok(agent) => {
                    let original = agent.name().to_string();
                    let inserted = roster.insert_unique(agent);
                    if inserted.name() != original {
                        diagnostics.push(format!(
                            "Renamed duplicate agent '{}' to '{}'",
                            original,
                            inserted.name()
                        ));
                    }
                }
                Err(e) => diagnostics.push(format!("Skipped '{}': {}", descriptor.expert_name, e)),
            }
        }

        (roster, diagnostics)
    }
}

fn default_goal(description: &str) -> String {
    format!("Complete tasks related to: {}", description)
}

fn default_backstory(role: &str, description: &str) -> String {
    format!(
        "As an expert in {}, I am here to help with: {}",
        role, description
    )
}

/// System message for an agent (without coordinator augmentation)
pub fn system_message(agent: &Agent) -> String {
    format!(
        "You are a helpful assistant that can act as {} who {}.",
        agent.name(),
        agent.description()
    )
}

/// Graph consumer shape for an agent
pub fn graph_config(agent: &Agent) -> GraphAgentConfig {
    let params = agent.config();
    GraphAgentConfig {
        kind: "assistant".to_string(),
        config: GraphAgentInner {
            name: agent.key().to_string(),
            llm_config: GraphLlmConfig {
                config_list: vec![GraphModelEntry {
                    model: agent.model().to_string(),
                    api_type: agent.provider().to_string(),
                }],
                temperature: params.temperature,
                max_tokens: params.max_tokens,
                top_p: params.top_p,
                timeout: GRAPH_TIMEOUT_SECS,
                cache_seed: Some(GRAPH_CACHE_SEED),
            },
            human_input_mode: "NEVER".to_string(),
            max_consecutive_auto_reply: GRAPH_MAX_AUTO_REPLY,
            system_message: system_message(agent),
        },
        description: agent.description().to_string(),
        tools: agent.tools().iter().cloned().collect(),
    }
}

/// Crew consumer shape for an agent
pub fn crew_config(agent: &Agent) -> CrewAgentConfig {
    CrewAgentConfig {
        name: agent.name().to_string(),
        description: agent.description().to_string(),
        role: agent.role().to_string(),
        goal: agent.goal().to_string(),
        backstory: agent.backstory().to_string(),
        verbose: true,
        allow_delegation: true,
        tools: agent.tools().iter().cloned().collect(),
        llm: format!("{}/{}", agent.provider(), agent.model()),
        temperature: agent.config().temperature,
    }
}
