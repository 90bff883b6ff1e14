//! Domain layer for teamforge
//!
//! Pure business logic with no I/O: the agent roster, the deliverable and
//! phase tracker, the moderator protocol, the discussion log and the
//! workflow assembler.
//!
//! # Core Concepts
//!
//! ## Team
//!
//! A free-text request is rephrased into a brief, and an LLM proposes a
//! team of expert agents. The [`parse_agent_descriptors`] parser recovers
//! descriptors from untidy output and [`AgentRecordBuilder`] turns each one
//! into an [`Agent`] with a stable [`AgentKey`].
//!
//! ## Project
//!
//! A project manager's kickoff plan seeds a [`Project`] whose
//! [`Deliverable`]s move through the fixed [`Phase`] order. A deliverable's
//! `done` flag is always derived from its phase flags.
//!
//! ## Discussion
//!
//! A moderator picks the next speaker with a `To <Agent>:` directive
//! ([`parse_directive`]) and can signal phase or deliverable completion.
//! Turns land in the append-only [`DiscussionLog`]; the [`Whiteboard`] is
//! recomputed from it on every read.

pub mod agent;
pub mod config;
pub mod core;
pub mod discussion;
pub mod moderator;
pub mod project;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod tool;
pub mod workflow;

// Re-export commonly used types
pub use agent::{
    builder::{AgentDefaults, AgentRecord, AgentRecordBuilder, crew_config, graph_config},
    entities::Agent,
    parser::{ParsedAgents, parse_agent_descriptors},
    records::{CrewAgentConfig, GraphAgentConfig},
    roster::Roster,
    value_objects::{AgentDescriptor, AgentKey},
};
pub use config::OutputFormat;
pub use core::{error::DomainError, request::UserRequest, sanitize::sanitize};
pub use discussion::{
    log::{DiscussionLog, DiscussionTurn, Speaker},
    whiteboard::{Whiteboard, extract_code},
};
pub use moderator::{
    context::{HISTORY_CHAR_LIMIT, ModeratorContext},
    directive::{DirectiveRejection, ModeratorDirective, parse_directive},
};
pub use project::{
    deliverable::{Deliverable, DeliverableTracker},
    entities::{Project, SignalOutcome},
    parser::parse_deliverables,
    phase::Phase,
};
pub use prompt::PromptTemplate;
pub use providers::{LlmParams, ProviderConfig, ProviderKind, ProviderSettings};
pub use session::entities::{Message, Role, Session};
pub use tool::ToolDefinition;
pub use workflow::{SkillDocument, TERMINATE, WorkflowDocument};
