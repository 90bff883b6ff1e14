//! Append-only discussion transcript

use super::whiteboard::Whiteboard;
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Speaker {
    User,
    ProjectManager,
    Agent(String),
}

impl Speaker {
    pub fn agent(name: impl Into<String>) -> Self {
        Speaker::Agent(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Speaker::User => "User",
            Speaker::ProjectManager => "Project Manager",
            Speaker::Agent(name) => name,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Speaker::User)
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One entry of the transcript (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionTurn {
    /// Logical sequence number, starting at 1
    pub seq: u64,
    pub speaker: Speaker,
    pub text: String,
}

impl DiscussionTurn {
    /// Transcript rendering of this turn
    pub fn formatted(&self) -> String {
        format!("{}:\n\n{}\n\n===\n\n", self.speaker.name(), self.text.trim())
    }
}

/// Ordered, append-only transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionLog {
    turns: Vec<DiscussionTurn>,
}

impl DiscussionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. A non-empty `user_input` is appended first as its own
    /// turn attributed to [`Speaker::User`]. Returns the sequence number of
    /// the speaker's turn.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>, user_input: Option<&str>) -> u64 {
        if let Some(input) = user_input.map(str::trim).filter(|s| !s.is_empty()) {
            self.push(Speaker::User, input.to_string());
        }
        self.push(speaker, text.into())
    }

    fn push(&mut self, speaker: Speaker, text: String) -> u64 {
        let seq = self.turns.len() as u64 + 1;
        self.turns.push(DiscussionTurn { seq, speaker, text });
        seq
    }

    pub fn turns(&self) -> &[DiscussionTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Latest turn that is not a user pseudo-turn
    pub fn most_recent(&self) -> Option<&DiscussionTurn> {
        self.turns.iter().rev().find(|t| !t.speaker.is_user())
    }

    /// Latest turn spoken by a roster agent
    pub fn last_agent_turn(&self) -> Option<&DiscussionTurn> {
        self.turns
            .iter()
            .rev()
            .find(|t| matches!(t.speaker, Speaker::Agent(_)))
    }

    /// Full formatted transcript
    pub fn history_text(&self) -> String {
        self.turns.iter().map(DiscussionTurn::formatted).collect()
    }

    /// Code and markup blocks found anywhere in the transcript, recomputed on every call
    pub fn whiteboard(&self) -> Whiteboard {
        Whiteboard::from_text(&self.history_text())
    }
}
