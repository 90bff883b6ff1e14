//! Begin Project use case
//!
//! Asks a project manager for a kickoff plan, extracts the deliverables and
//! starts the project. The kickoff becomes the first discussion turn.

use crate::config::DiscussionConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{RetryScope, send_with_retry};
use std::sync::Arc;
use teamforge_domain::{
    AgentDefaults, DeliverableTracker, Project, PromptTemplate, Session, parse_deliverables,
    sanitize,
};
use thiserror::Error;
use tracing::info;

const STEP: &str = "project manager";

/// Errors that can occur while starting a project
#[derive(Error, Debug)]
pub enum BeginProjectError {
    #[error("Generate a team before starting a project")]
    NoTeam,

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("The project manager's plan lists no deliverables")]
    NoDeliverables { response: String },
}

/// Use case for starting a project
pub struct BeginProjectUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    target: AgentDefaults,
    config: DiscussionConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> BeginProjectUseCase<G> {
    pub fn new(gateway: Arc<G>, target: AgentDefaults, config: DiscussionConfig) -> Self {
        Self {
            gateway,
            target,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub async fn execute(&self, session: &mut Session) -> Result<Vec<String>, BeginProjectError> {
        self.execute_with_progress(session, &NoProgress).await
    }

    /// Start the project and return the deliverable texts.
    ///
    /// On any failure the session keeps its previous project and log.
    pub async fn execute_with_progress(
        &self,
        session: &mut Session,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<String>, BeginProjectError> {
        let brief = match session.brief() {
            Some(brief) if !session.roster().is_empty() => brief.to_string(),
            _ => return Err(BeginProjectError::NoTeam),
        };

        let request = CompletionRequest::new(
            self.target.provider,
            self.target.model.clone(),
            self.target.params.clone(),
        )
        .with_system(PromptTemplate::project_manager_system())
        .with_user(PromptTemplate::project_manager_prompt(
            &sanitize(&brief),
            &session.roster().describe(),
        ));

        progress.on_step_start(STEP);
        let result = send_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config,
            RetryScope::TransientOnly,
            STEP,
            progress,
        )
        .await;
        progress.on_step_complete(STEP, result.is_ok());
        let response = result?;

        let deliverables = parse_deliverables(&response);
        if deliverables.is_empty() {
            return Err(BeginProjectError::NoDeliverables { response });
        }
        info!("Project started with {} deliverables", deliverables.len());

        self.conversation_logger.log(ConversationEvent::new(
            "project_started",
            serde_json::json!({
                "brief": brief,
                "deliverables": deliverables,
            }),
        ));

        let project = Project::new(brief, DeliverableTracker::from_texts(deliverables.clone()));
        session.start_project(project, response.trim());
        if let Some(turn) = session.log().most_recent() {
            progress.on_turn(turn);
        }

        Ok(deliverables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::testing::ScriptedGateway;
    use teamforge_domain::{
        Agent, LlmParams, Phase, ProviderKind, Roster, Speaker, UserRequest,
    };

    fn seeded_session() -> Session {
        let mut roster = Roster::new();
        for name in ["Project Manager", "Code Developer", "Code Tester"] {
            roster
                .add(Agent::new(
                    name,
                    format!("{name} duties"),
                    name,
                    "g",
                    "b",
                    Vec::new(),
                    ProviderKind::Groq,
                    "llama-3.3-70b-versatile",
                    LlmParams::default(),
                ))
                .unwrap();
        }
        let mut session = Session::new();
        session.install_team(UserRequest::try_new("login").unwrap(), "Build login", roster);
        session
    }

    fn use_case(gateway: Arc<ScriptedGateway>) -> BeginProjectUseCase<ScriptedGateway> {
        BeginProjectUseCase::new(
            gateway,
            AgentDefaults::default(),
            DiscussionConfig::default().immediate(),
        )
    }

    #[tokio::test]
    async fn test_starts_project_from_plan() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "Here is the plan.\n\n**Key Deliverables:**\n1. Build login API\n2. Write tests\n\nApproach:\nIterate.",
        ]));
        let mut session = seeded_session();
        let deliverables = use_case(gateway.clone())
            .execute(&mut session)
            .await
            .unwrap();

        assert_eq!(deliverables, vec!["Build login API", "Write tests"]);
        let project = session.project().unwrap();
        assert_eq!(project.current_phase(), Phase::Planning);
        assert_eq!(project.deliverables().len(), 2);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().turns()[0].speaker, Speaker::ProjectManager);

        let prompt = &gateway.requests()[0].messages[1].content;
        assert!(prompt.contains("Code Tester: Code Tester duties"));
    }

    #[tokio::test]
    async fn test_no_deliverables_keeps_session() {
        let gateway = Arc::new(ScriptedGateway::texts(&["We should get started soon."]));
        let mut session = seeded_session();
        let err = use_case(gateway).execute(&mut session).await.unwrap_err();
        assert!(matches!(err, BeginProjectError::NoDeliverables { .. }));
        assert!(session.project().is_none());
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_requires_team() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let mut session = Session::new();
        assert!(matches!(
            use_case(gateway).execute(&mut session).await,
            Err(BeginProjectError::NoTeam)
        ));
    }
}
