use super::anthropic::AnthropicAdapter;
use super::http::{build_client, mask_api_key, resolve_api_key};
use super::ollama::OllamaAdapter;
use super::openai_compat::OpenAiCompatAdapter;
use super::ProviderAdapter;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use teamforge_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use teamforge_domain::{ProviderConfig, ProviderKind};
use tracing::{debug, warn};

/// LLM gateway that routes each request to the adapter for its provider.
///
/// Adapters are built per request from the provider configuration, so a
/// missing credential only fails calls that actually need that provider.
pub struct RoutingGateway {
    client: Client,
    config: ProviderConfig,
}

impl RoutingGateway {
    pub fn new(config: ProviderConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Build the adapter for `kind`, resolving its credentials.
    fn resolve_provider(&self, kind: ProviderKind) -> Result<Box<dyn ProviderAdapter>, GatewayError> {
        let settings = self.config.settings_for(kind);
        let base_url = settings.base_url_for(kind);
        let api_key = resolve_api_key(kind, &settings)?;
        if let Some(key) = &api_key {
            debug!(provider = %kind, key = %mask_api_key(key), base_url = %base_url, "Resolved provider");
        }

        let adapter: Box<dyn ProviderAdapter> = match kind {
            ProviderKind::Groq | ProviderKind::OpenAi | ProviderKind::LmStudio => Box::new(
                OpenAiCompatAdapter::new(kind, self.client.clone(), base_url, api_key),
            ),
            ProviderKind::Anthropic => {
                let key = api_key.ok_or_else(|| {
                    GatewayError::Configuration("anthropic API key not set".to_string())
                })?;
                Box::new(AnthropicAdapter::new(self.client.clone(), base_url, key))
            }
            ProviderKind::Ollama => Box::new(OllamaAdapter::new(self.client.clone(), base_url)),
        };
        Ok(adapter)
    }

    /// Models for every provider, queried concurrently.
    ///
    /// Providers that cannot be reached report their static list.
    pub async fn list_all_models(&self) -> Vec<(ProviderKind, Vec<String>)> {
        let lookups = ProviderKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, self.models_or_known(kind).await) });
        join_all(lookups).await
    }

    async fn models_or_known(&self, kind: ProviderKind) -> Vec<String> {
        let listed = match self.resolve_provider(kind) {
            Ok(adapter) => adapter.available_models().await,
            Err(e) => Err(e),
        };
        match listed {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => known_models(kind),
            Err(e) => {
                debug!(provider = %kind, error = %e, "Model listing unavailable, using static list");
                known_models(kind)
            }
        }
    }
}

fn known_models(kind: ProviderKind) -> Vec<String> {
    kind.known_models().iter().map(|m| m.to_string()).collect()
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn send(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let adapter = self.resolve_provider(request.provider)?;
        let result = adapter.complete(request).await;
        if let Err(e) = &result {
            warn!(provider = %request.provider, model = %request.model, error = %e, "Completion failed");
        }
        result
    }

    async fn list_models(&self, provider: ProviderKind) -> Result<Vec<String>, GatewayError> {
        Ok(self.models_or_known(provider).await)
    }
}
