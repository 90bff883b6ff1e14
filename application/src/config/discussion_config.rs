//! Discussion loop parameters.
//!
//! [`DiscussionConfig`] groups the static parameters that control the
//! discussion driver and every LLM call it makes. These are application-layer
//! concerns, not domain policy.

use std::time::Duration;
use teamforge_domain::HISTORY_CHAR_LIMIT;

/// Discussion loop control parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscussionConfig {
    /// Turns `run` performs before giving control back.
    pub max_turns: usize,
    /// Unconditional delay before every outbound LLM call.
    pub throttle: Duration,
    /// Total attempts for a call that fails transiently.
    pub retry_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Trailing characters of history shown to the moderator and agents.
    pub history_char_limit: usize,
    /// Completion budget for the one-shot rate-limit retry.
    pub reduced_max_tokens: u32,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            throttle: Duration::from_millis(1000),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            history_char_limit: HISTORY_CHAR_LIMIT,
            reduced_max_tokens: 1024,
        }
    }
}

impl DiscussionConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_reduced_max_tokens(mut self, max_tokens: u32) -> Self {
        self.reduced_max_tokens = max_tokens;
        self
    }

    /// No throttle and no retry delay
    pub fn immediate(self) -> Self {
        let attempts = self.retry_attempts;
        self.with_throttle(Duration::ZERO)
            .with_retry(attempts, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = DiscussionConfig::default();
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.history_char_limit, 50_000);
        assert_eq!(config.reduced_max_tokens, 1024);
    }

    #[test]
    fn test_builder() {
        let config = DiscussionConfig::default()
            .with_max_turns(5)
            .with_retry(2, Duration::from_millis(10))
            .with_throttle(Duration::ZERO);
        assert_eq!(config.max_turns, 5);
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.throttle, Duration::ZERO);
    }

    #[test]
    fn test_immediate_keeps_attempts() {
        let config = DiscussionConfig::default().immediate();
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }
}
