//! The live set of agents available as speakers.

use super::entities::Agent;
use super::value_objects::AgentKey;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Ordered collection of agents with unique [`AgentKey`]s.
///
/// Order matters: the agent at index 0 is the coordinator when a workflow
/// document is assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The coordinator (first agent), if any
    pub fn coordinator(&self) -> Option<&Agent> {
        self.agents.first()
    }

    pub fn contains(&self, key: &AgentKey) -> bool {
        self.agents.iter().any(|a| a.key() == key)
    }

    pub fn get(&self, key: &AgentKey) -> Option<&Agent> {
        self.agents.iter().find(|a| a.key() == key)
    }

    fn get_mut(&mut self, key: &AgentKey) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.key() == key)
    }

    /// Case-insensitive lookup by display name (or any spelling of it)
    pub fn find(&self, name: &str) -> Option<&Agent> {
        let key = AgentKey::from_name(name);
        if key.is_empty() {
            return None;
        }
        self.get(&key)
    }

    /// Add an agent, rejecting a key collision
    pub fn add(&mut self, agent: Agent) -> Result<(), DomainError> {
        if agent.key().is_empty() {
            return Err(DomainError::EmptyAgentName);
        }
        if self.contains(agent.key()) {
            return Err(DomainError::DuplicateAgent(agent.name().to_string()));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// Add an agent, suffixing its name (" 2", " 3", ...) until the key is unique
    pub fn insert_unique(&mut self, mut agent: Agent) -> &Agent {
        if self.contains(agent.key()) {
            let base = agent.name().to_string();
            let description = agent.description().to_string();
            let mut n = 2;
            loop {
                let candidate = format!("{} {}", base, n);
                if !self.contains(&AgentKey::from_name(&candidate)) {
                    agent.rename(&candidate, description);
                    break;
                }
                n += 1;
            }
        }
        self.agents.push(agent);
        let last = self.agents.len() - 1;
        &self.agents[last]
    }

    /// Apply the edit form to an agent. Fails if the new name collides with another agent.
    pub fn rename(
        &mut self,
        key: &AgentKey,
        name: &str,
        description: impl Into<String>,
    ) -> Result<AgentKey, DomainError> {
        let new_key = AgentKey::from_name(name);
        if new_key.is_empty() {
            return Err(DomainError::EmptyAgentName);
        }
        if &new_key != key && self.contains(&new_key) {
            return Err(DomainError::DuplicateAgent(name.to_string()));
        }
        let agent = self
            .get_mut(key)
            .ok_or_else(|| DomainError::AgentNotFound(key.to_string()))?;
        agent.rename(name, description);
        Ok(new_key)
    }

    /// Replace an agent's tool set
    pub fn set_tools(
        &mut self,
        key: &AgentKey,
        tools: impl IntoIterator<Item = String>,
    ) -> Result<(), DomainError> {
        let agent = self
            .get_mut(key)
            .ok_or_else(|| DomainError::AgentNotFound(key.to_string()))?;
        agent.set_tools(tools);
        Ok(())
    }

    /// Delete an agent
    pub fn remove(&mut self, key: &AgentKey) -> Result<Agent, DomainError> {
        let index = self
            .agents
            .iter()
            .position(|a| a.key() == key)
            .ok_or_else(|| DomainError::AgentNotFound(key.to_string()))?;
        Ok(self.agents.remove(index))
    }

    /// `name: description` lines, one per agent, in roster order
    pub fn describe(&self) -> String {
        self.agents
            .iter()
            .map(Agent::roster_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Display names in roster order
    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(Agent::name).collect()
    }
}
