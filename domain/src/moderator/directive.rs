//! Moderator directive parsing.
//!
//! A valid directive starts with `To <AgentName>:` where the name resolves
//! against the live roster. Two literal markers may appear anywhere in the
//! body and are evaluated independently.

use crate::agent::roster::Roster;
use crate::agent::value_objects::AgentKey;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Marker signalling the current phase of the current deliverable is done
pub const PHASE_COMPLETED: &str = "PHASE_COMPLETED";
/// Marker signalling the current deliverable is done
pub const DELIVERABLE_COMPLETED: &str = "DELIVERABLE_COMPLETED";

static TARGET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^To ([\w ]+):").expect("valid regex"));

/// Why a moderator response was not accepted as a directive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveRejection {
    #[error("moderator response is empty")]
    Empty,

    #[error("moderator response does not start with 'To <Agent>:'")]
    MissingPrefix,

    #[error("moderator addressed unknown agent '{0}'")]
    UnknownAgent(String),
}

/// Parsed result of one moderator call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorDirective {
    /// Display name of the resolved roster agent
    pub target_agent: String,
    pub target_key: AgentKey,
    /// Directive body with the prefix and markers removed
    pub prompt_text: String,
    pub phase_completed: bool,
    pub deliverable_completed: bool,
}

/// Parse a moderator response against the live roster.
pub fn parse_directive(
    response: &str,
    roster: &Roster,
) -> Result<ModeratorDirective, DirectiveRejection> {
    let text = response.trim();
    if text.is_empty() {
        return Err(DirectiveRejection::Empty);
    }

    let caps = TARGET_PREFIX
        .captures(text)
        .ok_or(DirectiveRejection::MissingPrefix)?;
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return Err(DirectiveRejection::MissingPrefix);
    };
    let requested = name.as_str().trim();

    let agent = roster
        .find(requested)
        .ok_or_else(|| DirectiveRejection::UnknownAgent(requested.to_string()))?;

    let mut body = text[whole.end()..].to_string();
    let phase_completed = body.contains(PHASE_COMPLETED);
    if phase_completed {
        body = body.replace(PHASE_COMPLETED, "");
    }
    let deliverable_completed = body.contains(DELIVERABLE_COMPLETED);
    if deliverable_completed {
        body = body.replace(DELIVERABLE_COMPLETED, "");
    }

    Ok(ModeratorDirective {
        target_agent: agent.name().to_string(),
        target_key: agent.key().clone(),
        prompt_text: body.trim().to_string(),
        phase_completed,
        deliverable_completed,
    })
}
