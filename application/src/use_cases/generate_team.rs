//! Generate Team use case
//!
//! Rephrases the user's request into a brief, asks the model for a team of
//! experts and installs the parsed roster in the session.

use crate::config::DiscussionConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{RetryScope, send_with_retry};
use std::sync::Arc;
use teamforge_domain::{
    AgentDefaults, AgentRecordBuilder, PromptTemplate, Session, UserRequest,
    parse_agent_descriptors, sanitize,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while generating a team
#[derive(Error, Debug)]
pub enum GenerateTeamError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("The model response contained no usable agents")]
    NoAgents { diagnostics: Vec<String> },
}

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct GenerateTeamOutput {
    pub brief: String,
    pub agent_names: Vec<String>,
    /// Descriptors that were dropped or renamed
    pub diagnostics: Vec<String>,
}

/// Use case for turning a request into a roster
pub struct GenerateTeamUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    defaults: AgentDefaults,
    config: DiscussionConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> GenerateTeamUseCase<G> {
    pub fn new(gateway: Arc<G>, defaults: AgentDefaults, config: DiscussionConfig) -> Self {
        Self {
            gateway,
            defaults,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        session: &mut Session,
        request: UserRequest,
    ) -> Result<GenerateTeamOutput, GenerateTeamError> {
        self.execute_with_progress(session, request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// The session is only touched once a non-empty roster exists.
    pub async fn execute_with_progress(
        &self,
        session: &mut Session,
        request: UserRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<GenerateTeamOutput, GenerateTeamError> {
        info!("Generating team for request ({} chars)", request.content().len());

        let rephrase = self
            .request()
            .with_system(PromptTemplate::rephrase_system())
            .with_user(PromptTemplate::rephrase_prompt(&sanitize(request.content())));
        let brief = self.call("rephrase", &rephrase, progress).await?;
        let brief = brief.trim().to_string();

        let generate = self
            .request()
            .with_user(PromptTemplate::agent_generation_prompt(&sanitize(&brief)));
        let raw = self.call("agents", &generate, progress).await?;

        let parsed = parse_agent_descriptors(&raw);
        let builder = AgentRecordBuilder::new(self.defaults.clone());
        let (roster, build_diagnostics) = builder.build_roster(&parsed.descriptors);

        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(build_diagnostics);
        for diagnostic in &diagnostics {
            warn!("Agent descriptor: {}", diagnostic);
        }

        if roster.is_empty() {
            return Err(GenerateTeamError::NoAgents { diagnostics });
        }

        let agent_names: Vec<String> = roster.names().iter().map(|n| n.to_string()).collect();
        info!("Generated {} agents: {}", agent_names.len(), agent_names.join(", "));

        self.conversation_logger.log(ConversationEvent::new(
            "team_generated",
            serde_json::json!({
                "request": request.content(),
                "brief": brief,
                "agents": agent_names,
                "diagnostics": diagnostics,
            }),
        ));

        session.install_team(request, brief.clone(), roster);

        Ok(GenerateTeamOutput {
            brief,
            agent_names,
            diagnostics,
        })
    }

    fn request(&self) -> CompletionRequest {
        CompletionRequest::new(
            self.defaults.provider,
            self.defaults.model.clone(),
            self.defaults.params.clone(),
        )
    }

    async fn call(
        &self,
        step: &str,
        request: &CompletionRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        progress.on_step_start(step);
        let result = send_with_retry(
            self.gateway.as_ref(),
            request,
            &self.config,
            RetryScope::TransientOnly,
            step,
            progress,
        )
        .await;
        progress.on_step_complete(step, result.is_ok());
        result
    }
}
