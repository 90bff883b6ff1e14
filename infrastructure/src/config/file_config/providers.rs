//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use teamforge_domain::{LlmParams, ProviderConfig, ProviderKind, ProviderSettings};

/// Connection settings for one backend (`[provider.<name>]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderSettings {
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL override, e.g. a proxy or a self-hosted gateway.
    pub base_url: Option<String>,
}

impl FileProviderSettings {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            api_key_env: self.api_key_env.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Raw `[provider]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Default provider: "groq", "openai", "anthropic", "ollama", "lmstudio".
    pub default: String,
    /// Default model; falls back to the provider's default model.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub groq: FileProviderSettings,
    pub openai: FileProviderSettings,
    pub anthropic: FileProviderSettings,
    pub ollama: FileProviderSettings,
    pub lmstudio: FileProviderSettings,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        let params = LlmParams::default();
        Self {
            default: ProviderKind::default().as_str().to_string(),
            model: None,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            groq: FileProviderSettings::default(),
            openai: FileProviderSettings::default(),
            anthropic: FileProviderSettings::default(),
            ollama: FileProviderSettings::default(),
            lmstudio: FileProviderSettings::default(),
        }
    }
}

impl FileProviderConfig {
    fn settings(&self, kind: ProviderKind) -> &FileProviderSettings {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Ollama => &self.ollama,
            ProviderKind::LmStudio => &self.lmstudio,
        }
    }

    /// Sampling parameters applied to every agent
    pub fn params(&self) -> LlmParams {
        LlmParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            stop: None,
        }
    }

    /// Convert to the domain provider configuration.
    ///
    /// Fails only on an unknown default provider name; `validate` reports
    /// the same condition earlier.
    pub fn to_provider_config(&self) -> Result<ProviderConfig, String> {
        let default: ProviderKind = self
            .default
            .parse()
            .map_err(|_| self.default.clone())?;

        let settings: HashMap<ProviderKind, ProviderSettings> = ProviderKind::ALL
            .into_iter()
            .filter(|kind| !self.settings(*kind).is_empty())
            .map(|kind| (kind, self.settings(kind).to_settings()))
            .collect();

        Ok(ProviderConfig {
            default,
            model: self.model.clone().filter(|m| !m.trim().is_empty()),
            params: self.params(),
            settings,
        })
    }
}
