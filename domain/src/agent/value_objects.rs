//! Agent value objects.
//!
//! - [`AgentKey`] - canonical identifier derived from an agent's display name
//! - [`AgentDescriptor`] - one candidate agent extracted from an LLM response

use serde::{Deserialize, Serialize};

/// Normalize a raw agent name into its display form.
///
/// Every character other than an ASCII letter, digit or space becomes a
/// space, then runs of whitespace collapse to a single space. The result
/// always fits the moderator's `To <Agent>:` pattern.
pub fn display_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical identifier for an agent.
///
/// `display_name(name).to_lowercase()` with spaces replaced by underscores.
/// The same key is used for exported file names, roster lookups and
/// moderator target matching, so two spellings of one agent
/// ("Code Developer", "code_developer", "CODE  DEVELOPER") share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentKey(String);

impl AgentKey {
    /// Derive the key for a (possibly unnormalized) agent name.
    pub fn from_name(name: &str) -> Self {
        Self(display_name(name).to_lowercase().replace(' ', "_"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AgentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate agent as described by the team-generation LLM.
///
/// Only `expert_name` is mandatory; the builder derives defaults for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub expert_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl AgentDescriptor {
    pub fn new(expert_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            expert_name: expert_name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_normalizes() {
        assert_eq!(display_name("Code_Developer"), "Code Developer");
        assert_eq!(display_name("  Code   <Developer> "), "Code Developer");
        assert_eq!(display_name("Ünit Tester"), "nit Tester");
        assert_eq!(display_name("Q.A. Lead"), "Q A Lead");
        assert_eq!(display_name("Dev-Ops/SRE"), "Dev Ops SRE");
    }

    #[test]
    fn test_punctuation_only_name_is_empty() {
        assert_eq!(display_name("!!!"), "");
        assert!(AgentKey::from_name("'-.'").is_empty());
    }

    #[test]
    fn test_key_is_stable_across_spellings() {
        let expected = AgentKey::from_name("Code Developer");
        assert_eq!(expected.as_str(), "code_developer");
        assert_eq!(AgentKey::from_name("code_developer"), expected);
        assert_eq!(AgentKey::from_name("CODE  DEVELOPER"), expected);
        // Keys are fixed points
        assert_eq!(AgentKey::from_name(expected.as_str()), expected);
    }

    #[test]
    fn test_empty_key() {
        assert!(AgentKey::from_name("🚀🚀").is_empty());
    }
}
