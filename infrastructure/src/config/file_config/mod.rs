//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application types
//! after validation.

mod discussion;
mod export;
mod providers;
mod terminal;

pub use discussion::FileDiscussionConfig;
pub use export::{FileExportConfig, FileLoggingConfig, FileToolsConfig};
pub use providers::{FileProviderConfig, FileProviderSettings};
pub use terminal::{FileOutputConfig, FileReplConfig};

use serde::{Deserialize, Serialize};
use teamforge_application::DiscussionConfig;
use teamforge_domain::ProviderConfig;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("discussion.max_turns cannot be 0")]
    ZeroMaxTurns,

    #[error("discussion.retry_attempts cannot be 0")]
    ZeroRetryAttempts,

    #[error("provider.max_tokens cannot be 0")]
    ZeroMaxTokens,

    #[error("provider.temperature must be within [0, 2], got {0}")]
    TemperatureOutOfRange(f32),

    #[error("repl.history_size cannot be 0")]
    ZeroHistorySize,

    #[error("unknown provider '{0}' (expected groq, openai, anthropic, ollama or lmstudio)")]
    UnknownProvider(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// LLM backend selection and sampling parameters
    pub provider: FileProviderConfig,
    /// Discussion loop pacing and limits
    pub discussion: FileDiscussionConfig,
    /// Export destinations
    pub export: FileExportConfig,
    /// Tool registry
    pub tools: FileToolsConfig,
    /// Transcript and log files
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.discussion.max_turns == 0 {
            return Err(ConfigValidationError::ZeroMaxTurns);
        }
        if self.discussion.retry_attempts == 0 {
            return Err(ConfigValidationError::ZeroRetryAttempts);
        }
        if self.provider.max_tokens == 0 {
            return Err(ConfigValidationError::ZeroMaxTokens);
        }
        if self.repl.history_size == 0 {
            return Err(ConfigValidationError::ZeroHistorySize);
        }
        let temperature = self.provider.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigValidationError::TemperatureOutOfRange(temperature));
        }
        self.provider_config().map(|_| ())
    }

    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigValidationError> {
        self.provider
            .to_provider_config()
            .map_err(ConfigValidationError::UnknownProvider)
    }

    pub fn discussion_config(&self) -> DiscussionConfig {
        self.discussion.to_discussion_config()
    }
}
