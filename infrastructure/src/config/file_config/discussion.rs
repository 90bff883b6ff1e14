//! Discussion loop configuration from TOML (`[discussion]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use teamforge_application::DiscussionConfig;

/// Raw discussion configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Turns a non-interactive run performs at most
    pub max_turns: usize,
    /// Delay before every LLM call, in milliseconds
    pub throttle_ms: u64,
    /// Total attempts for a transiently failing call
    pub retry_attempts: u32,
    /// Fixed delay between attempts, in milliseconds
    pub retry_delay_ms: u64,
    /// Trailing characters of history given to the moderator
    pub history_char_limit: usize,
    /// Completion budget for the rate-limit retry
    pub reduced_max_tokens: u32,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let defaults = DiscussionConfig::default();
        Self {
            max_turns: defaults.max_turns,
            throttle_ms: defaults.throttle.as_millis() as u64,
            retry_attempts: defaults.retry_attempts,
            retry_delay_ms: defaults.retry_delay.as_millis() as u64,
            history_char_limit: defaults.history_char_limit,
            reduced_max_tokens: defaults.reduced_max_tokens,
        }
    }
}

impl FileDiscussionConfig {
    pub fn to_discussion_config(&self) -> DiscussionConfig {
        DiscussionConfig {
            max_turns: self.max_turns,
            throttle: Duration::from_millis(self.throttle_ms),
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            history_char_limit: self.history_char_limit,
            reduced_max_tokens: self.reduced_max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        assert_eq!(
            FileDiscussionConfig::default().to_discussion_config(),
            DiscussionConfig::default()
        );
    }

    #[test]
    fn test_millisecond_fields() {
        let file: FileDiscussionConfig = toml::from_str("throttle_ms = 0\nretry_delay_ms = 250").unwrap();
        let config = file.to_discussion_config();
        assert_eq!(config.throttle, Duration::ZERO);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.max_turns, 20);
    }
}
