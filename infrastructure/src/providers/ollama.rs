//! Ollama chat API adapter.

use super::ProviderAdapter;
use super::http::{map_transport_error, read_json, role_name};
use super::response::{first_content, parse_response};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use teamforge_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use teamforge_domain::ProviderKind;
use tracing::debug;

pub struct OllamaAdapter {
    client: Client,
    base_url: String,
}

impl OllamaAdapter {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

/// Request body for `POST /chat` (non-streaming)
pub fn request_body(request: &CompletionRequest) -> Value {
    let messages: Vec<Value> = request
        .messages
        .iter()
        .map(|m| json!({ "role": role_name(&m.role), "content": m.content }))
        .collect();

    let mut options = json!({
        "temperature": request.params.temperature,
        "top_p": request.params.top_p,
        "num_predict": request.params.max_tokens,
    });
    if let Some(stop) = &request.params.stop {
        options["stop"] = json!([stop]);
    }

    json!({
        "model": request.model,
        "messages": messages,
        "stream": false,
        "options": options,
    })
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let url = format!("{}/chat", self.base_url);
        debug!(model = %request.model, "Sending Ollama chat");

        let response = self
            .client
            .post(&url)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| map_transport_error(ProviderKind::Ollama, e))?;

        let body = read_json(ProviderKind::Ollama, response).await?;
        first_content(&parse_response(ProviderKind::Ollama, body)?)
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error(ProviderKind::Ollama, e))?;

        let body = read_json(ProviderKind::Ollama, response).await?;
        Ok(body
            .get("models")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("name").and_then(Value::as_str))
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
    fn test_request_body_is_not_streaming() {
        let request = CompletionRequest::new(ProviderKind::Ollama, "llama3.1", LlmParams::default())
            .with_user("Hello");
        let body = request_body(&request);

        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 2048);
        assert_eq!(body["messages"][0]["role"], "user");
    }
}
