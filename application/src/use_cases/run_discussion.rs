//! Run Discussion use case
//!
//! The discussion loop driver. Each turn runs
//! moderator -> agent call -> log append -> tracker update; `run` repeats
//! turns until every deliverable is done, the caller cancels, or the turn
//! budget is spent.
//!
//! A turn either completes fully or leaves the session untouched: the log and
//! the tracker are only mutated after the agent's reply has arrived.

use crate::config::DiscussionConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::moderate::{ModerateUseCase, ModeratorDecision};
use crate::use_cases::shared::{RetryScope, send_with_retry};
use std::sync::Arc;
use teamforge_domain::agent::builder::system_message;
use teamforge_domain::core::string::tail_chars;
use teamforge_domain::{
    AgentDefaults, AgentKey, DomainError, PromptTemplate, Session, SignalOutcome,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that abort a turn
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("No project has been started")]
    NoProject,

    #[error("Agent not found: {0}")]
    UnknownAgent(String),

    #[error(
        "{provider} rate limit reached while {agent} was answering. \
         Wait a moment, then retry the turn with a reduced token budget."
    )]
    RateLimited {
        agent: String,
        provider: String,
        /// The turn that was not taken, for [`RunDiscussionUseCase::retry_reduced`]
        pending: PendingTurn,
    },

    #[error("Gateway error: {0}")]
    GatewayError(GatewayError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// A turn that has been decided but not yet taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub agent: AgentKey,
    pub instruction: String,
    pub user_input: Option<String>,
    pub phase_completed: bool,
    pub deliverable_completed: bool,
    /// A moderator directive chose the speaker
    pub directed: bool,
}

impl PendingTurn {
    /// A turn without completion signals
    pub fn manual(agent: AgentKey, instruction: impl Into<String>, user_input: Option<&str>) -> Self {
        Self {
            agent,
            instruction: instruction.into(),
            user_input: user_input
                .map(str::trim)
                .filter(|input| !input.is_empty())
                .map(str::to_string),
            phase_completed: false,
            deliverable_completed: false,
            directed: false,
        }
    }
}

/// What one completed turn did
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub seq: u64,
    pub agent: String,
    /// `true` when a moderator directive chose the speaker
    pub directed: bool,
    pub signals: SignalOutcome,
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Spoke(TurnReport),
    /// No directive and no previous speaker to fall back to
    NeedsInput(String),
    /// The agent gave no reply within the retry budget
    NoResponse { agent: String, error: String },
    /// Every deliverable is done
    Completed,
}

/// Why `run` stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
    MaxTurns,
    NeedsInput(String),
}

/// Result of `run`
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub turns: usize,
    pub outcome: RunOutcome,
    pub reports: Vec<TurnReport>,
}

/// Use case driving the discussion
pub struct RunDiscussionUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    moderator: ModerateUseCase<G>,
    config: DiscussionConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RunDiscussionUseCase<G> {
    /// `moderator` names the backend that plays the moderator role
    pub fn new(gateway: Arc<G>, moderator: AgentDefaults, config: DiscussionConfig) -> Self {
        Self {
            moderator: ModerateUseCase::new(Arc::clone(&gateway), moderator, config.clone()),
            gateway,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.moderator = self.moderator.with_conversation_logger(Arc::clone(&logger));
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &DiscussionConfig {
        &self.config
    }

    /// Run turns until done, cancelled, stuck or out of turns.
    pub async fn run(
        &self,
        session: &mut Session,
        cancel: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunSummary, TurnError> {
        let mut reports = Vec::new();

        let outcome = loop {
            if cancel.is_cancelled() {
                break RunOutcome::Stopped;
            }
            if session.project().ok_or(TurnError::NoProject)?.is_complete() {
                break RunOutcome::Completed;
            }
            if reports.len() >= self.config.max_turns {
                break RunOutcome::MaxTurns;
            }

            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => break RunOutcome::Stopped,
                step = self.step(session, progress) => step?,
            };

            match step {
                StepOutcome::Spoke(report) => reports.push(report),
                StepOutcome::Completed => break RunOutcome::Completed,
                StepOutcome::NeedsInput(reason) => break RunOutcome::NeedsInput(reason),
                StepOutcome::NoResponse { agent, error } => {
                    break RunOutcome::NeedsInput(format!("{agent} did not respond: {error}"));
                }
            }
        };

        info!("Discussion stopped after {} turns: {:?}", reports.len(), outcome);
        self.conversation_logger.log(ConversationEvent::new(
            "discussion_finished",
            serde_json::json!({
                "turns": reports.len(),
                "outcome": format!("{outcome:?}"),
            }),
        ));

        Ok(RunSummary {
            turns: reports.len(),
            outcome,
            reports,
        })
    }

    /// One moderated turn.
    ///
    /// Without a usable directive the previous speaker continues; with no
    /// previous speaker the step asks for input.
    pub async fn step(
        &self,
        session: &mut Session,
        progress: &dyn ProgressNotifier,
    ) -> Result<StepOutcome, TurnError> {
        if session.project().ok_or(TurnError::NoProject)?.is_complete() {
            return Ok(StepOutcome::Completed);
        }

        let decision = self.moderator.decide(session, progress).await?;
        let pending = match decision {
            ModeratorDecision::Directive(directive) => {
                let instruction = if directive.prompt_text.is_empty() {
                    PromptTemplate::continuation_prompt().to_string()
                } else {
                    directive.prompt_text
                };
                PendingTurn {
                    agent: directive.target_key,
                    instruction,
                    user_input: None,
                    phase_completed: directive.phase_completed,
                    deliverable_completed: directive.deliverable_completed,
                    directed: true,
                }
            }
            other => {
                let reason = other.failure_reason().unwrap_or_default();
                match session.last_speaker() {
                    Some(agent) => {
                        info!("Falling back to previous speaker {}", agent.name());
                        PendingTurn::manual(
                            agent.key().clone(),
                            PromptTemplate::continuation_prompt(),
                            None,
                        )
                    }
                    None => return Ok(StepOutcome::NeedsInput(reason)),
                }
            }
        };

        self.take_turn(session, pending, None, progress).await
    }

    /// A manual turn: the user picks the agent and the instruction.
    pub async fn step_with(
        &self,
        session: &mut Session,
        agent: &AgentKey,
        instruction: &str,
        user_input: Option<&str>,
        progress: &dyn ProgressNotifier,
    ) -> Result<StepOutcome, TurnError> {
        let instruction = if instruction.trim().is_empty() {
            PromptTemplate::continuation_prompt()
        } else {
            instruction.trim()
        };
        let pending = PendingTurn::manual(agent.clone(), instruction, user_input);
        self.take_turn(session, pending, None, progress).await
    }

    /// Retry a rate-limited turn once with the reduced token budget.
    pub async fn retry_reduced(
        &self,
        session: &mut Session,
        pending: PendingTurn,
        progress: &dyn ProgressNotifier,
    ) -> Result<StepOutcome, TurnError> {
        info!(
            "Retrying turn for {} with max_tokens={}",
            pending.agent, self.config.reduced_max_tokens
        );
        self.take_turn(
            session,
            pending,
            Some(self.config.reduced_max_tokens),
            progress,
        )
        .await
    }

    /// Execute with default (no-op) progress
    pub async fn step_quiet(&self, session: &mut Session) -> Result<StepOutcome, TurnError> {
        self.step(session, &NoProgress).await
    }

    async fn take_turn(
        &self,
        session: &mut Session,
        pending: PendingTurn,
        max_tokens: Option<u32>,
        progress: &dyn ProgressNotifier,
    ) -> Result<StepOutcome, TurnError> {
        let project = session.project().ok_or(TurnError::NoProject)?;
        let agent = session
            .roster()
            .get(&pending.agent)
            .ok_or_else(|| TurnError::UnknownAgent(pending.agent.to_string()))?;

        let instruction = match &pending.user_input {
            Some(input) => format!("{}\n\nUser input:\n{}", pending.instruction, input),
            None => pending.instruction.clone(),
        };
        let history = session.log().history_text();
        let prompt = PromptTemplate::agent_turn_prompt(
            project.re_engineered_prompt(),
            tail_chars(&history, self.config.history_char_limit),
            &instruction,
            project
                .current_deliverable_text()
                .unwrap_or("All deliverables are complete"),
            project.current_phase().as_str(),
        );

        let mut request =
            CompletionRequest::new(agent.provider(), agent.model(), agent.config().clone())
                .with_system(system_message(agent))
                .with_user(prompt);
        if let Some(max_tokens) = max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let agent_name = agent.name().to_string();
        let provider = agent.provider().to_string();

        progress.on_step_start(&agent_name);
        let result = send_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config,
            RetryScope::TransientOnly,
            &agent_name,
            progress,
        )
        .await;
        progress.on_step_complete(&agent_name, result.is_ok());

        let text = match result {
            Ok(text) => text,
            Err(e) if e.is_rate_limited() => {
                warn!("{} rate limited on {}", agent_name, provider);
                return Err(TurnError::RateLimited {
                    agent: agent_name,
                    provider,
                    pending,
                });
            }
            Err(e) if e.is_configuration() => return Err(TurnError::GatewayError(e)),
            Err(e) => {
                warn!("{} gave no reply: {}", agent_name, e);
                return Ok(StepOutcome::NoResponse {
                    agent: agent_name,
                    error: e.to_string(),
                });
            }
        };

        let seq = session.record_turn(&pending.agent, text.trim(), pending.user_input.as_deref())?;
        if let Some(turn) = session.log().most_recent() {
            progress.on_turn(turn);
        }
        self.conversation_logger.log(ConversationEvent::new(
            "agent_turn",
            serde_json::json!({
                "turn": seq,
                "agent": agent_name,
                "instruction": pending.instruction,
                "user_input": pending.user_input,
                "text": text.trim(),
            }),
        ));

        let project = session.project_mut().ok_or(TurnError::NoProject)?;
        let signals = project.apply_signals(pending.phase_completed, pending.deliverable_completed);
        self.report_signals(session, &signals, progress);

        Ok(StepOutcome::Spoke(TurnReport {
            seq,
            agent: agent_name,
            directed: pending.directed,
            signals,
        }))
    }

    fn report_signals(
        &self,
        session: &Session,
        signals: &SignalOutcome,
        progress: &dyn ProgressNotifier,
    ) {
        let Some(project) = session.project() else {
            return;
        };

        if let Some(index) = signals.deliverable_completed
            && let Some(deliverable) = project.deliverables().get(index)
        {
            info!("Deliverable {} completed: {}", index + 1, deliverable.text());
            self.conversation_logger.log(ConversationEvent::new(
                "deliverable_completed",
                serde_json::json!({ "index": index, "text": deliverable.text() }),
            ));
            progress.on_deliverable_completed(index, deliverable.text());
        }

        if let Some(phase) = signals.advanced_to {
            info!("Project phase advanced to {}", phase);
            self.conversation_logger.log(ConversationEvent::new(
                "phase_advanced",
                serde_json::json!({
                    "phase": phase.as_str(),
                    "marked": signals.phase_marked.map(|(i, p)| (i, p.as_str())),
                }),
            ));
            progress.on_phase_advanced(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::testing::{ScriptedGateway, rate_limited};
    use std::sync::Mutex;
    use teamforge_domain::{
        Agent, DeliverableTracker, LlmParams, Phase, Project, ProviderKind, Roster, Speaker,
        UserRequest,
    };

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<Phase>>,
        rejected: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_step_start(&self, _step: &str) {}
        fn on_step_complete(&self, _step: &str, _success: bool) {}

        fn on_directive_rejected(&self, reason: &str) {
            self.rejected.lock().unwrap().push(reason.to_string());
        }

        fn on_phase_advanced(&self, phase: Phase) {
            self.phases.lock().unwrap().push(phase);
        }
    }

    fn session(deliverables: &[&str]) -> Session {
        let mut roster = Roster::new();
        for name in ["Project Manager", "Code Developer", "Code Tester"] {
            roster
                .add(Agent::new(
                    name,
                    "d",
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
        session.start_project(
            Project::new(
                "Build login",
                DeliverableTracker::from_texts(deliverables.iter().copied()),
            ),
            "kickoff",
        );
        session
    }

    fn driver(gateway: Arc<ScriptedGateway>) -> RunDiscussionUseCase<ScriptedGateway> {
        RunDiscussionUseCase::new(
            gateway,
            AgentDefaults::default(),
            DiscussionConfig::default().immediate(),
        )
    }

    #[tokio::test]
    async fn test_round_robin_advances_phase_once() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "To Project Manager: outline the plan",
            "Plan: endpoints, storage, tokens.",
            "To Code Developer: sketch the handler",
            "```rust\nfn login() {}\n```",
            "To Code Tester: PHASE_COMPLETED list the test cases",
            "Cases: valid login, bad password.",
        ]));
        let mut session = session(&["Build login API"]);
        let progress = RecordingProgress::default();
        let driver = RunDiscussionUseCase::new(
            gateway,
            AgentDefaults::default(),
            DiscussionConfig::default().immediate().with_max_turns(3),
        );

        let summary = driver
            .run(&mut session, &CancellationToken::new(), &progress)
            .await
            .unwrap();

        assert_eq!(summary.turns, 3);
        assert_eq!(summary.outcome, RunOutcome::MaxTurns);
        assert_eq!(*progress.phases.lock().unwrap(), vec![Phase::Development]);

        let project = session.project().unwrap();
        assert_eq!(project.current_phase(), Phase::Development);
        let deliverable = project.deliverables().get(0).unwrap();
        assert!(deliverable.phase_status()[&Phase::Planning]);
        assert!(!deliverable.is_done());

        let speakers: Vec<&str> = session
            .log()
            .turns()
            .iter()
            .map(|t| t.speaker.name())
            .collect();
        assert_eq!(
            speakers,
            vec!["Project Manager", "Project Manager", "Code Developer", "Code Tester"]
        );
        assert_eq!(session.log().whiteboard().blocks(), ["fn login() {}"]);
    }

    #[tokio::test]
    async fn test_rejected_directive_falls_back_to_previous_speaker() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "To Code Developer: start",
            "started",
            "To Nonexistent Agent: go",
            "continued",
        ]));
        let mut session = session(&["Build login API"]);
        let driver = driver(gateway);
        let progress = RecordingProgress::default();

        driver.step(&mut session, &progress).await.unwrap();
        let outcome = driver.step(&mut session, &progress).await.unwrap();

        match outcome {
            StepOutcome::Spoke(report) => {
                assert_eq!(report.agent, "Code Developer");
                assert!(!report.directed);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(progress.rejected.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_directive_without_previous_speaker_needs_input() {
        let gateway = Arc::new(ScriptedGateway::texts(&["Someone should code."]));
        let mut session = session(&["Build login API"]);
        let outcome = driver(gateway).step_quiet(&mut session).await.unwrap();
        assert!(matches!(outcome, StepOutcome::NeedsInput(_)));
        assert_eq!(session.log().len(), 1);
    }

    #[tokio::test]
    async fn test_deliverable_completion_finishes_run() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "To Code Developer: ship it DELIVERABLE_COMPLETED",
            "shipped",
        ]));
        let mut session = session(&["Build login API"]);
        let summary = driver(gateway)
            .run(&mut session, &CancellationToken::new(), &NoProgress)
            .await
            .unwrap();
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert!(session.project().unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_cancelled_run_stops_before_calling() {
        let gateway = Arc::new(ScriptedGateway::texts(&["To Code Developer: go", "ok"]));
        let mut session = session(&["Build login API"]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = driver(gateway.clone())
            .run(&mut session, &cancel, &NoProgress)
            .await
            .unwrap();
        assert_eq!(summary.outcome, RunOutcome::Stopped);
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_leaves_state_and_reduced_retry_succeeds() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok("To Code Tester: PHASE_COMPLETED run the suite".to_string()),
            Err(rate_limited()),
        ]));
        let mut session = session(&["Build login API"]);
        let driver = driver(gateway.clone());

        let err = driver.step_quiet(&mut session).await.unwrap_err();
        let pending = match err {
            TurnError::RateLimited { pending, .. } => pending,
            other => panic!("unexpected error: {other:?}"),
        };
        assert!(pending.phase_completed);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.project().unwrap().current_phase(), Phase::Planning);

        gateway.push(Ok("suite passes".to_string()));
        let outcome = driver
            .retry_reduced(&mut session, pending, &NoProgress)
            .await
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Spoke(_)));
        assert_eq!(session.project().unwrap().current_phase(), Phase::Development);

        let last = gateway.requests().pop().unwrap();
        assert_eq!(last.params.max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_reduced_retry_keeps_directive_origin_without_signals() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok("To Code Developer: write the handler".to_string()),
            Err(rate_limited()),
        ]));
        let mut session = session(&["Build login API"]);
        let driver = driver(gateway.clone());

        let pending = match driver.step_quiet(&mut session).await.unwrap_err() {
            TurnError::RateLimited { pending, .. } => pending,
            other => panic!("unexpected error: {other:?}"),
        };
        assert!(pending.directed);
        assert!(!pending.phase_completed && !pending.deliverable_completed);

        gateway.push(Ok("handler written".to_string()));
        match driver
            .retry_reduced(&mut session, pending, &NoProgress)
            .await
            .unwrap()
        {
            StepOutcome::Spoke(report) => {
                assert_eq!(report.agent, "Code Developer");
                assert!(report.directed);
                assert!(!report.signals.changed());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_manual_turn_logs_user_input_first() {
        let gateway = Arc::new(ScriptedGateway::texts(&["Using bcrypt."]));
        let mut session = session(&["Build login API"]);
        driver(gateway.clone())
            .step_with(
                &mut session,
                &AgentKey::from_name("code developer"),
                "hash the passwords",
                Some("use bcrypt"),
                &NoProgress,
            )
            .await
            .unwrap();

        let turns = session.log().turns();
        assert_eq!(turns[1].speaker, Speaker::User);
        assert_eq!(turns[1].text, "use bcrypt");
        assert_eq!(turns[2].speaker, Speaker::agent("Code Developer"));
        assert_eq!(session.log().most_recent().unwrap().text, "Using bcrypt.");

        let prompt = &gateway.requests()[0].messages[1].content;
        assert!(prompt.contains("hash the passwords"));
        assert!(prompt.contains("use bcrypt"));
    }

    #[tokio::test]
    async fn test_agent_silence_is_not_fatal() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Ok("To Code Developer: go".to_string()),
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
        ]));
        let mut session = session(&["Build login API"]);
        let outcome = driver(gateway).step_quiet(&mut session).await.unwrap();
        assert!(matches!(outcome, StepOutcome::NoResponse { .. }));
        assert_eq!(session.log().len(), 1);
    }
}
