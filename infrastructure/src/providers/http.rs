//! Shared HTTP plumbing for provider adapters: credentials, status mapping
//! and transport errors.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use teamforge_application::ports::llm_gateway::GatewayError;
use teamforge_domain::{ProviderKind, ProviderSettings, Role};

/// Per-request timeout for completion calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the HTTP client shared by every adapter
pub fn build_client() -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))
}

/// Mask API key for safe display
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Resolve the API key for `kind`.
///
/// A direct key wins over the environment. Providers that need a key and
/// have none yield a configuration error; local providers yield `None`.
pub fn resolve_api_key(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Option<String>, GatewayError> {
    if let Some(key) = settings.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        return Ok(Some(key.clone()));
    }

    let env_name = settings.api_key_env_for(kind);
    let from_env = env_name
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|k| !k.trim().is_empty());

    match (from_env, kind.requires_api_key()) {
        (Some(key), _) => Ok(Some(key)),
        (None, false) => Ok(None),
        (None, true) => Err(GatewayError::Configuration(format!(
            "{} API key not set (export {})",
            kind,
            env_name.unwrap_or_default()
        ))),
    }
}

/// Wire name of a chat role
pub fn role_name(role: &Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Map a transport failure
pub fn map_transport_error(kind: ProviderKind, error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() || error.is_request() {
        GatewayError::ConnectionError(format!("{}: {}", kind, error))
    } else if error.is_decode() {
        GatewayError::InvalidResponse(error.to_string())
    } else {
        GatewayError::Other(error.to_string())
    }
}

/// Map a non-success status code and its body
pub fn map_status(kind: ProviderKind, status: StatusCode, body: &str) -> GatewayError {
    let message = sanitize_api_error(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        return GatewayError::RateLimited {
            provider: kind.to_string(),
            message,
        };
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return GatewayError::Configuration(format!("{} rejected the API key: {}", kind, message));
    }
    GatewayError::Status {
        provider: kind.to_string(),
        status: status.as_u16(),
        message,
    }
}

/// Turn a response into its JSON body, mapping failures
pub async fn read_json(
    kind: ProviderKind,
    response: Response,
) -> Result<serde_json::Value, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status(kind, status, &body));
    }
    response
        .json()
        .await
        .map_err(|e| map_transport_error(kind, e))
}

/// Keep provider error bodies short and free of credentials
fn sanitize_api_error(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string());

    let lower = message.to_lowercase();
    if lower.contains("api key") || lower.contains("apikey") || lower.contains("authentication") {
        return "authentication error, check the configured API key".to_string();
    }
    message.chars().take(300).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("gsk_1234567890abcd"), "gsk_...abcd");
    }

    #[test]
    fn test_mask_api_key_counts_chars_not_bytes() {
        assert_eq!(mask_api_key("aключ-1234567890"), "aклю...7890");
        assert_eq!(mask_api_key("ключключ"), "****");
        assert_eq!(mask_api_key("1234567890ключ"), "1234...ключ");
    }

    #[test]
    fn test_direct_key_wins() {
        let settings = ProviderSettings {
            api_key: Some("direct-key".to_string()),
            api_key_env: Some("TEAMFORGE_TEST_UNSET_VAR".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_api_key(ProviderKind::Groq, &settings).unwrap().as_deref(),
            Some("direct-key")
        );
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let settings = ProviderSettings {
            api_key_env: Some("TEAMFORGE_TEST_DEFINITELY_UNSET".to_string()),
            ..Default::default()
        };
        let err = resolve_api_key(ProviderKind::OpenAi, &settings).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("TEAMFORGE_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let settings = ProviderSettings {
            api_key_env: Some("TEAMFORGE_TEST_DEFINITELY_UNSET".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(ProviderKind::Ollama, &settings).unwrap(), None);
    }

    #[test]
    fn test_map_status() {
        let limited = map_status(
            ProviderKind::Groq,
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached"}}"#,
        );
        assert_eq!(
            limited,
            GatewayError::RateLimited {
                provider: "groq".to_string(),
                message: "Rate limit reached".to_string()
            }
        );

        let busy = map_status(ProviderKind::OpenAi, StatusCode::BAD_GATEWAY, "upstream down");
        assert!(busy.is_transient());

        let bad = map_status(ProviderKind::OpenAi, StatusCode::BAD_REQUEST, "{}");
        assert!(!bad.is_transient());

        let auth = map_status(
            ProviderKind::Anthropic,
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"invalid x-api-key"}}"#,
        );
        assert!(auth.is_configuration());
    }
}
