//! LLM provider adapters.
//!
//! One [`ProviderAdapter`] per wire protocol; [`RoutingGateway`] picks the
//! adapter from the request's provider and implements the application's
//! `LlmGateway` port.

pub mod anthropic;
pub mod http;
pub mod ollama;
pub mod openai_compat;
pub mod response;
pub mod routing;

pub use routing::RoutingGateway;

use async_trait::async_trait;
use teamforge_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use teamforge_domain::ProviderKind;

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;
    /// Send one completion and return the reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
    async fn available_models(&self) -> Result<Vec<String>, GatewayError>;
}
