//! Session domain entities

use crate::agent::roster::Roster;
use crate::agent::value_objects::AgentKey;
use crate::agent::entities::Agent;
use crate::core::error::DomainError;
use crate::core::request::UserRequest;
use crate::discussion::log::{DiscussionLog, Speaker};
use crate::project::entities::Project;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// All mutable state of one user session (Entity)
///
/// Every use case takes the session by `&mut` instead of reaching into shared
/// state. Multi-user hosts keep one `Session` per session key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    request: Option<UserRequest>,
    /// Rephrased request the team works against
    brief: Option<String>,
    roster: Roster,
    project: Option<Project>,
    log: DiscussionLog,
    last_speaker: Option<AgentKey>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> Option<&UserRequest> {
        self.request.as_ref()
    }

    pub fn brief(&self) -> Option<&str> {
        self.brief.as_deref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    pub fn log(&self) -> &DiscussionLog {
        &self.log
    }

    /// Agent that spoke last, if it is still on the roster
    pub fn last_speaker(&self) -> Option<&Agent> {
        self.last_speaker.as_ref().and_then(|key| self.roster.get(key))
    }

    /// Install a freshly generated team.
    ///
    /// Any running project and its discussion belong to the previous team
    /// and are dropped.
    pub fn install_team(&mut self, request: UserRequest, brief: impl Into<String>, roster: Roster) {
        self.request = Some(request);
        self.brief = Some(brief.into());
        self.roster = roster;
        self.project = None;
        self.log = DiscussionLog::new();
        self.last_speaker = None;
    }

    /// Start a project, recording the project manager's kickoff as the first turn.
    pub fn start_project(&mut self, project: Project, kickoff: impl Into<String>) {
        self.project = Some(project);
        self.log = DiscussionLog::new();
        self.log.append(Speaker::ProjectManager, kickoff, None);
        self.last_speaker = None;
    }

    /// Append an agent turn and make that agent the last speaker.
    pub fn record_turn(
        &mut self,
        agent: &AgentKey,
        text: impl Into<String>,
        user_input: Option<&str>,
    ) -> Result<u64, DomainError> {
        let name = self
            .roster
            .get(agent)
            .map(|a| a.name().to_string())
            .ok_or_else(|| DomainError::AgentNotFound(agent.to_string()))?;
        let seq = self.log.append(Speaker::agent(name), text, user_input);
        self.last_speaker = Some(agent.clone());
        Ok(seq)
    }

    /// Delete an agent from the roster.
    pub fn remove_agent(&mut self, key: &AgentKey) -> Result<Agent, DomainError> {
        let removed = self.roster.remove(key)?;
        if self.last_speaker.as_ref() == Some(key) {
            self.last_speaker = None;
        }
        Ok(removed)
    }

    /// Rename an agent, keeping the last-speaker pointer on the same agent.
    pub fn rename_agent(
        &mut self,
        key: &AgentKey,
        name: &str,
        description: impl Into<String>,
    ) -> Result<AgentKey, DomainError> {
        let new_key = self.roster.rename(key, name, description)?;
        if self.last_speaker.as_ref() == Some(key) {
            self.last_speaker = Some(new_key.clone());
        }
        Ok(new_key)
    }

    /// Clear everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::deliverable::DeliverableTracker;
    use crate::providers::{LlmParams, ProviderKind};

    fn agent(name: &str) -> Agent {
        Agent::new(
            name,
            "d",
            name,
            "g",
            "b",
            Vec::new(),
            ProviderKind::Groq,
            "m",
            LlmParams::default(),
        )
    }

    fn session() -> Session {
        let mut roster = Roster::new();
        roster.add(agent("Code Developer")).unwrap();
        roster.add(agent("Code Tester")).unwrap();
        let mut session = Session::new();
        session.install_team(UserRequest::try_new("login").unwrap(), "Build login", roster);
        session
    }

    #[test]
    fn test_start_project_logs_kickoff() {
        let mut session = session();
        session.start_project(
            Project::new("Build login", DeliverableTracker::from_texts(["Build login API"])),
            "Key Deliverables:\n1. Build login API",
        );
        let turn = session.log().most_recent().unwrap();
        assert_eq!(turn.speaker, Speaker::ProjectManager);
        assert!(session.project().is_some());
    }

    #[test]
    fn test_record_turn_tracks_last_speaker() {
        let mut session = session();
        let key = AgentKey::from_name("Code Tester");
        session.record_turn(&key, "tests pass", Some("please test")).unwrap();
        assert_eq!(session.last_speaker().unwrap().name(), "Code Tester");
        assert_eq!(session.log().len(), 2);
        assert!(session.record_turn(&AgentKey::from_name("Ghost"), "x", None).is_err());
    }

    #[test]
    fn test_remove_and_rename_follow_last_speaker() {
        let mut session = session();
        let key = AgentKey::from_name("Code Tester");
        session.record_turn(&key, "t", None).unwrap();

        let renamed = session.rename_agent(&key, "QA Engineer", "checks").unwrap();
        assert_eq!(session.last_speaker().unwrap().name(), "QA Engineer");

        session.remove_agent(&renamed).unwrap();
        assert!(session.last_speaker().is_none());
        assert_eq!(session.roster().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = session();
        session.reset();
        assert!(session.roster().is_empty());
        assert!(session.brief().is_none());
        assert!(session.project().is_none());
        assert!(session.log().is_empty());
    }
}
