//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use teamforge_domain::{LlmParams, Message, ProviderKind};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Rate limited by {provider}: {message}")]
    RateLimited { provider: String, message: String },

    #[error("HTTP {status} from {provider}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Failures worth retrying with the same request
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::ConnectionError(_) | GatewayError::Timeout | GatewayError::EmptyResponse => {
                true
            }
            GatewayError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP 429 or an equivalent provider signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited { .. })
    }

    /// Missing credential, unsupported provider or similar
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::Configuration(_))
    }
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub provider: ProviderKind,
    pub model: String,
    pub params: LlmParams,
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(provider: ProviderKind, model: impl Into<String>, params: LlmParams) -> Self {
        Self {
            provider,
            model: model.into(),
            params,
            messages: Vec::new(),
        }
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Same request with a smaller completion budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params = self.params.with_max_tokens(max_tokens);
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a completion request and return the text content of the reply
    async fn send(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Models offered by `provider`
    async fn list_models(&self, provider: ProviderKind) -> Result<Vec<String>, GatewayError>;
}
