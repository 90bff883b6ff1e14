//! Anthropic Messages API adapter.

use super::ProviderAdapter;
use super::http::{map_transport_error, read_json, role_name};
use super::response::{first_content, parse_response};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use teamforge_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use teamforge_domain::{ProviderKind, Role};
use tracing::debug;

/// Value of the `anthropic-version` header
pub const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicAdapter {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
    }
}

/// Request body for `POST /messages`.
///
/// System messages move to the top-level `system` field.
pub fn request_body(request: &CompletionRequest) -> Value {
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let messages: Vec<Value> = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| json!({ "role": role_name(&m.role), "content": m.content }))
        .collect();

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "max_tokens": request.params.max_tokens,
        "temperature": request.params.temperature,
        "top_p": request.params.top_p,
    });
    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }
    if let Some(stop) = &request.params.stop {
        body["stop_sequences"] = json!([stop]);
    }
    body
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let url = format!("{}/messages", self.base_url);
        debug!(model = %request.model, "Sending Anthropic message");

        let response = self
            .headers(self.client.post(&url))
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| map_transport_error(ProviderKind::Anthropic, e))?;

        let body = read_json(ProviderKind::Anthropic, response).await?;
        first_content(&parse_response(ProviderKind::Anthropic, body)?)
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .headers(self.client.get(&url))
            .send()
            .await
            .map_err(|e| map_transport_error(ProviderKind::Anthropic, e))?;

        let body = read_json(ProviderKind::Anthropic, response).await?;
        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_domain::LlmParams;

    #[test]
    fn test_system_prompt_is_lifted() {
        let request = CompletionRequest::new(
            ProviderKind::Anthropic,
            "claude-3-5-haiku-latest",
            LlmParams::default().with_max_tokens(512),
        )
        .with_system("You moderate.")
        .with_user("Who speaks next?");
        let body = request_body(&request);

        assert_eq!(body["system"], "You moderate.");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_no_system_field_without_system_message() {
        let request = CompletionRequest::new(
            ProviderKind::Anthropic,
            "claude-3-5-haiku-latest",
            LlmParams::default(),
        )
        .with_user("Hi");
        assert!(request_body(&request).get("system").is_none());
    }
}
