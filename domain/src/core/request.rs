//! User request value object

use serde::{Deserialize, Serialize};

/// The free-text request a team is assembled for (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    content: String,
}

impl UserRequest {
    /// Try to create a new request, returning None if blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self {
                content: content.trim().to_string(),
            })
        }
    }

    /// Get the request content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for UserRequest {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s).ok_or_else(|| {
            crate::core::error::DomainError::InvalidRequest("request cannot be empty".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims() {
        let request = UserRequest::try_new("  build a login page \n").unwrap();
        assert_eq!(request.content(), "build a login page");
    }

    #[test]
    fn test_blank_request_rejected() {
        assert!(UserRequest::try_new("   ").is_none());
        assert!("".parse::<UserRequest>().is_err());
    }
}
