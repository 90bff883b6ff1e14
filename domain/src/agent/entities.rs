//! Agent domain entities

use super::value_objects::{AgentKey, display_name};
use crate::providers::{LlmParams, ProviderKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An LLM-backed role participating in the discussion (Entity)
///
/// Identity is the [`AgentKey`] derived from `name`. Apart from `tools`,
/// which the tool selector may replace, and the name/description pair of
/// the edit form, agents are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    key: AgentKey,
    name: String,
    description: String,
    role: String,
    goal: String,
    backstory: String,
    tools: BTreeSet<String>,
    provider: ProviderKind,
    model: String,
    /// Passed through unmodified to the LLM caller
    config: LlmParams,
}

impl Agent {
    /// Create an agent. `name` is normalized with [`display_name`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        description: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        tools: impl IntoIterator<Item = String>,
        provider: ProviderKind,
        model: impl Into<String>,
        config: LlmParams,
    ) -> Self {
        let name = display_name(name);
        Self {
            key: AgentKey::from_name(&name),
            name,
            description: description.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: tools.into_iter().collect(),
            provider,
            model: model.into(),
            config,
        }
    }

    pub fn key(&self) -> &AgentKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn tools(&self) -> &BTreeSet<String> {
        &self.tools
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &LlmParams {
        &self.config
    }

    /// Replace the tool set (tool-selector edit)
    pub fn set_tools(&mut self, tools: impl IntoIterator<Item = String>) {
        self.tools = tools.into_iter().collect();
    }

    /// Apply the edit form. The key is recomputed from the new name.
    pub(crate) fn rename(&mut self, name: &str, description: impl Into<String>) {
        self.name = display_name(name);
        self.key = AgentKey::from_name(&self.name);
        self.description = description.into();
    }

    /// `name: description` line used when presenting the roster to the moderator
    pub fn roster_line(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> Agent {
        Agent::new(
            name,
            "writes code",
            "Developer",
            "ship it",
            "veteran",
            vec!["fetch_web_content".to_string()],
            ProviderKind::Groq,
            "llama-3.3-70b-versatile",
            LlmParams::default(),
        )
    }

    #[test]
    fn test_new_normalizes_name_and_key() {
        let a = agent("Code_Developer");
        assert_eq!(a.name(), "Code Developer");
        assert_eq!(a.key().as_str(), "code_developer");
        assert_eq!(a.roster_line(), "Code Developer: writes code");
    }

    #[test]
    fn test_rename_recomputes_key() {
        let mut a = agent("Code Developer");
        a.rename("Senior Engineer", "reviews code");
        assert_eq!(a.key().as_str(), "senior_engineer");
        assert_eq!(a.description(), "reviews code");
    }

    #[test]
    fn test_set_tools_dedupes() {
        let mut a = agent("Code Developer");
        a.set_tools(vec!["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(a.tools().iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
