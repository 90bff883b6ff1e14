//! OpenAI-compatible chat completions adapter (Groq, OpenAI, LM Studio).

use super::ProviderAdapter;
use super::http::{map_transport_error, read_json, role_name};
use super::response::{first_content, parse_response};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use teamforge_application::ports::llm_gateway::{CompletionRequest, GatewayError};
use teamforge_domain::ProviderKind;
use tracing::debug;

pub struct OpenAiCompatAdapter {
    kind: ProviderKind,
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatAdapter {
    pub fn new(
        kind: ProviderKind,
        client: Client,
        base_url: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            kind,
            client,
            base_url,
            api_key,
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

/// Request body for `POST /chat/completions`
pub fn request_body(request: &CompletionRequest) -> Value {
    let messages: Vec<Value> = request
        .messages
        .iter()
        .map(|m| json!({ "role": role_name(&m.role), "content": m.content }))
        .collect();

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "temperature": request.params.temperature,
        "max_tokens": request.params.max_tokens,
        "top_p": request.params.top_p,
    });
    if let Some(stop) = &request.params.stop {
        body["stop"] = json!([stop]);
    }
    body
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.kind, model = %request.model, "Sending chat completion");

        let response = self
            .authorized(self.client.post(&url))
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| map_transport_error(self.kind, e))?;

        let body = read_json(self.kind, response).await?;
        first_content(&parse_response(self.kind, body)?)
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| map_transport_error(self.kind, e))?;

        let body = read_json(self.kind, response).await?;
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
