//! Application layer for teamforge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DiscussionConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    export_sink::{ExportBundle, ExportReceipt, ExportSink, ExportSinkError, Named},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    tool_registry::{NoTools, ToolRegistry},
};
pub use use_cases::begin_project::{BeginProjectError, BeginProjectUseCase};
pub use use_cases::export::{ExportError, ExportReport, ExportUseCase};
pub use use_cases::generate_team::{GenerateTeamError, GenerateTeamOutput, GenerateTeamUseCase};
pub use use_cases::moderate::{ModerateUseCase, ModeratorDecision};
pub use use_cases::run_discussion::{
    PendingTurn, RunDiscussionUseCase, RunOutcome, RunSummary, StepOutcome, TurnError, TurnReport,
};
