//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent name collides with an existing agent: {0}")]
    DuplicateAgent(String),

    #[error("Agent name is empty after sanitizing")]
    EmptyAgentName,

    #[error("Deliverable index out of range: {0}")]
    DeliverableOutOfRange(usize),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("No project has been started")]
    NoProject,

    #[error("Roster is empty")]
    EmptyRoster,
}

impl DomainError {
    /// Check if this error was caused by bad configuration rather than bad data
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::UnsupportedProvider(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::AgentNotFound("Code Tester".to_string());
        assert_eq!(error.to_string(), "Agent not found: Code Tester");
    }

    #[test]
    fn test_is_configuration_check() {
        assert!(DomainError::UnsupportedProvider("foo".to_string()).is_configuration());
        assert!(!DomainError::NoProject.is_configuration());
        assert!(!DomainError::EmptyAgentName.is_configuration());
    }
}
