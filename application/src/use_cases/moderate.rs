//! Moderate use case
//!
//! One moderator decision: assemble the bounded prompt, call the model and
//! validate the directive against the live roster. Moderator calls retry on
//! both transient failures and rate limiting; when the budget runs out the
//! decision is [`ModeratorDecision::Unavailable`] rather than an error.

use crate::config::DiscussionConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::run_discussion::TurnError;
use crate::use_cases::shared::{RetryScope, send_with_retry};
use std::sync::Arc;
use teamforge_domain::{
    AgentDefaults, DirectiveRejection, ModeratorContext, ModeratorDirective, PromptTemplate,
    Session, parse_directive,
};
use tracing::{info, warn};

const STEP: &str = "moderator";

/// Outcome of one moderator call
#[derive(Debug, Clone, PartialEq)]
pub enum ModeratorDecision {
    Directive(ModeratorDirective),
    /// The response broke the `To <Agent>:` protocol
    Rejected {
        reason: DirectiveRejection,
        response: String,
    },
    /// No response within the retry budget
    Unavailable { error: GatewayError },
}

impl ModeratorDecision {
    /// Human-readable reason when no directive was produced
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            ModeratorDecision::Directive(_) => None,
            ModeratorDecision::Rejected { reason, .. } => Some(reason.to_string()),
            ModeratorDecision::Unavailable { error } => {
                Some(format!("moderator unavailable: {error}"))
            }
        }
    }
}

/// Use case for one moderator decision
pub struct ModerateUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    target: AgentDefaults,
    config: DiscussionConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> ModerateUseCase<G> {
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

    /// Build the moderator prompt for the current session state
    pub fn prompt(&self, session: &Session) -> Result<String, TurnError> {
        let project = session.project().ok_or(TurnError::NoProject)?;
        let history = session.log().history_text();
        let last_comment = session.log().last_agent_turn().map(|t| t.text.as_str());
        let roster = session.roster().describe();

        let context = ModeratorContext {
            goal: project.re_engineered_prompt(),
            history: &history,
            last_speaker: session.last_speaker().map(|a| a.name()),
            last_comment,
            roster: &roster,
            deliverable: project.current_deliverable_text(),
            phase: project.current_phase().as_str(),
            history_limit: self.config.history_char_limit,
        };
        Ok(context.prompt())
    }

    /// Ask the moderator who speaks next.
    ///
    /// Only configuration failures are errors; everything else degrades to
    /// a rejected or unavailable decision.
    pub async fn decide(
        &self,
        session: &Session,
        progress: &dyn ProgressNotifier,
    ) -> Result<ModeratorDecision, TurnError> {
        let request = CompletionRequest::new(
            self.target.provider,
            self.target.model.clone(),
            self.target.params.clone(),
        )
        .with_system(PromptTemplate::moderator_system())
        .with_user(self.prompt(session)?);

        progress.on_step_start(STEP);
        let result = send_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config,
            RetryScope::IncludeRateLimited,
            STEP,
            progress,
        )
        .await;
        progress.on_step_complete(STEP, result.is_ok());

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_configuration() => return Err(TurnError::GatewayError(e)),
            Err(error) => {
                warn!("Moderator produced no directive: {}", error);
                progress.on_directive_rejected(&error.to_string());
                return Ok(ModeratorDecision::Unavailable { error });
            }
        };

        match parse_directive(&response, session.roster()) {
            Ok(directive) => {
                info!(
                    "Moderator -> {} (phase_completed={}, deliverable_completed={})",
                    directive.target_agent, directive.phase_completed, directive.deliverable_completed
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "moderator_directive",
                    serde_json::json!({
                        "target": directive.target_agent,
                        "prompt": directive.prompt_text,
                        "phase_completed": directive.phase_completed,
                        "deliverable_completed": directive.deliverable_completed,
                    }),
                ));
                progress.on_directive(&directive);
                Ok(ModeratorDecision::Directive(directive))
            }
            Err(reason) => {
                warn!("Moderator directive rejected: {}", reason);
                self.conversation_logger.log(ConversationEvent::new(
                    "directive_rejected",
                    serde_json::json!({
                        "reason": reason.to_string(),
                        "response": response,
                    }),
                ));
                progress.on_directive_rejected(&reason.to_string());
                Ok(ModeratorDecision::Rejected { reason, response })
            }
        }
    }
}
