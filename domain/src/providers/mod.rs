//! Provider catalogue and provider-neutral settings.
//!
//! [`ProviderKind`] is the closed set of LLM backends an agent can be
//! answered by. Adding a backend means adding a variant here and an adapter
//! in the infrastructure layer; there is no string-keyed dispatch.

use crate::core::error::DomainError;
use std::collections::HashMap;

/// Available LLM providers (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    Groq,
    OpenAi,
    Anthropic,
    Ollama,
    LmStudio,
}

impl ProviderKind {
    /// Every supported provider, in display order
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Groq,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Ollama,
        ProviderKind::LmStudio,
    ];

    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::LmStudio => "lmstudio",
        }
    }

    /// Base URL used when the configuration does not override it
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Ollama => "http://localhost:11434/api",
            ProviderKind::LmStudio => "http://localhost:1234/v1",
        }
    }

    /// Environment variable holding the API key, if the provider needs one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Ollama | ProviderKind::LmStudio => None,
        }
    }

    /// Whether a request without credentials is a configuration error
    pub fn requires_api_key(&self) -> bool {
        self.api_key_env().is_some()
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        self.known_models()[0]
    }

    /// Static model list, used when the provider's listing endpoint is unreachable
    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Groq => &[
                "llama-3.3-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
                "gemma2-9b-it",
            ],
            ProviderKind::OpenAi => &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"],
            ProviderKind::Anthropic => &[
                "claude-3-5-sonnet-latest",
                "claude-3-5-haiku-latest",
                "claude-3-opus-latest",
            ],
            ProviderKind::Ollama => &["llama3.1", "mistral", "qwen2.5"],
            ProviderKind::LmStudio => &["local-model"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            "lmstudio" | "lm-studio" => Ok(ProviderKind::LmStudio),
            other => Err(DomainError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl serde::Serialize for ProviderKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for ProviderKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sampling parameters passed through unmodified to the LLM caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LlmParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Optional stop sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

impl Default for LlmParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 2048,
            top_p: 1.0,
            stop: None,
        }
    }
}

impl LlmParams {
    /// Same parameters with a different token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Connection settings for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Environment variable name for the API key (overrides the provider default)
    pub api_key_env: Option<String>,
    /// Direct API key; prefer `api_key_env`
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
}

impl ProviderSettings {
    /// Effective base URL, without a trailing slash
    pub fn base_url_for(&self, kind: ProviderKind) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(kind.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Effective API key env var name
    pub fn api_key_env_for(&self, kind: ProviderKind) -> Option<String> {
        self.api_key_env
            .clone()
            .or_else(|| kind.api_key_env().map(str::to_string))
    }
}

/// Top-level provider configuration.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Provider used when an agent does not name one
    pub default: ProviderKind,
    /// Model used when an agent does not name one
    pub model: Option<String>,
    /// Default sampling parameters
    pub params: LlmParams,
    /// Per-provider connection settings
    pub settings: HashMap<ProviderKind, ProviderSettings>,
}

impl ProviderConfig {
    /// Model used when nothing more specific is configured
    pub fn default_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.default.default_model().to_string())
    }

    /// Settings for a provider (empty settings if none configured)
    pub fn settings_for(&self, kind: ProviderKind) -> ProviderSettings {
        self.settings.get(&kind).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let err = "fireworks".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err, DomainError::UnsupportedProvider("fireworks".to_string()));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_local_providers_need_no_key() {
        assert!(!ProviderKind::Ollama.requires_api_key());
        assert!(!ProviderKind::LmStudio.requires_api_key());
        assert!(ProviderKind::Groq.requires_api_key());
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let settings = ProviderSettings {
            base_url: Some("http://proxy:8080/v1/".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.base_url_for(ProviderKind::OpenAi), "http://proxy:8080/v1");
        assert_eq!(
            ProviderSettings::default().base_url_for(ProviderKind::Groq),
            "https://api.groq.com/openai/v1"
        );
    }

    #[test]
    fn test_default_model_falls_back_to_provider() {
        let config = ProviderConfig::default();
        assert_eq!(config.default_model(), "llama-3.3-70b-versatile");
    }
}
