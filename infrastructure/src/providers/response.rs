//! Response normalization.
//!
//! Every provider reply is rewritten to the OpenAI chat shape
//! `{"choices":[{"message":{"content": ...}}]}` before the text is read, so
//! callers see one format regardless of backend.

use serde_json::{Value, json};
use teamforge_application::ports::llm_gateway::GatewayError;
use teamforge_domain::ProviderKind;

/// Rewrite a raw provider body into the chat-completions shape
pub fn parse_response(kind: ProviderKind, body: Value) -> Result<Value, GatewayError> {
    match kind {
        ProviderKind::Groq | ProviderKind::OpenAi | ProviderKind::LmStudio => {
            if body.get("choices").is_some_and(Value::is_array) {
                Ok(body)
            } else {
                Err(invalid(kind, "missing choices"))
            }
        }
        ProviderKind::Anthropic => {
            let blocks = body
                .get("content")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid(kind, "missing content blocks"))?;
            let text: String = blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("");
            Ok(wrap(&text))
        }
        ProviderKind::Ollama => {
            let text = body
                .pointer("/message/content")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(kind, "missing message.content"))?;
            Ok(wrap(text))
        }
    }
}

/// Text of the first choice; blank text is an empty response
pub fn first_content(normalized: &Value) -> Result<String, GatewayError> {
    let text = normalized
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text.to_string())
}

fn wrap(text: &str) -> Value {
    json!({ "choices": [ { "message": { "role": "assistant", "content": text } } ] })
}

fn invalid(kind: ProviderKind, what: &str) -> GatewayError {
    GatewayError::InvalidResponse(format!("{}: {}", kind, what))
}
