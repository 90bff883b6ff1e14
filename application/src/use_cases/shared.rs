//! Shared utilities for use cases.
//!
//! Every outbound LLM call goes through [`send_with_retry`]: a fixed throttle
//! before each attempt and a fixed retry budget for transient failures.

use crate::config::DiscussionConfig;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use tracing::{debug, warn};

/// Which failures are retried besides transient ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryScope {
    /// Transient failures only; rate limiting surfaces at once
    TransientOnly,
    /// Transient failures and rate limiting
    IncludeRateLimited,
}

/// Send `request`, retrying on failure per `config`.
///
/// A blank reply counts as [`GatewayError::EmptyResponse`]. Delays are
/// fixed; there is no backoff.
pub(crate) async fn send_with_retry<G: LlmGateway + ?Sized>(
    gateway: &G,
    request: &CompletionRequest,
    config: &DiscussionConfig,
    scope: RetryScope,
    step: &str,
    progress: &dyn ProgressNotifier,
) -> Result<String, GatewayError> {
    let attempts = config.retry_attempts.max(1);
    let mut attempt = 1;

    loop {
        tokio::time::sleep(config.throttle).await;
        debug!(
            "{}: sending to {}/{} (attempt {}/{})",
            step, request.provider, request.model, attempt, attempts
        );

        let error = match gateway.send(request).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => GatewayError::EmptyResponse,
            Err(e) => e,
        };

        let retryable = error.is_transient()
            || (scope == RetryScope::IncludeRateLimited && error.is_rate_limited());
        if !retryable || attempt >= attempts {
            return Err(error);
        }

        warn!(
            "{}: attempt {}/{} failed: {}",
            step, attempt, attempts, error
        );
        progress.on_retry(step, attempt, attempts, &error.to_string());
        tokio::time::sleep(config.retry_delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted gateway shared by the use case tests.

    use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use teamforge_domain::ProviderKind;

    /// Mock gateway that returns scripted replies in order and records requests
    pub struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGateway {
        pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub fn push(&self, response: Result<String, GatewayError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn remaining(&self) -> usize {
            self.responses.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn send(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }

        async fn list_models(&self, provider: ProviderKind) -> Result<Vec<String>, GatewayError> {
            Ok(provider.known_models().iter().map(|m| m.to_string()).collect())
        }
    }

    pub fn rate_limited() -> GatewayError {
        GatewayError::RateLimited {
            provider: "groq".to_string(),
            message: "Too many requests".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{ScriptedGateway, rate_limited};
    use super::*;
    use crate::ports::progress::NoProgress;
    use std::time::Duration;
    use teamforge_domain::{LlmParams, ProviderKind};

    fn config() -> DiscussionConfig {
        DiscussionConfig::default().immediate()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(ProviderKind::Groq, "m", LlmParams::default()).with_user("hi")
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Timeout),
            Ok("   ".to_string()),
            Ok("hello".to_string()),
        ]);
        let text = send_with_retry(
            &gateway,
            &request(),
            &config(),
            RetryScope::TransientOnly,
            "test",
            &NoProgress,
        )
        .await
        .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(gateway.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_budget_is_fixed() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
            Ok("too late".to_string()),
        ]);
        let err = send_with_retry(
            &gateway,
            &request(),
            &config().with_retry(3, Duration::ZERO),
            RetryScope::TransientOnly,
            "test",
            &NoProgress,
        )
        .await
        .unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        assert_eq!(gateway.remaining(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_scope() {
        let gateway = ScriptedGateway::new(vec![Err(rate_limited()), Ok("ok".to_string())]);
        let err = send_with_retry(
            &gateway,
            &request(),
            &config(),
            RetryScope::TransientOnly,
            "test",
            &NoProgress,
        )
        .await
        .unwrap_err();
        assert!(err.is_rate_limited());

        let gateway = ScriptedGateway::new(vec![Err(rate_limited()), Ok("ok".to_string())]);
        let text = send_with_retry(
            &gateway,
            &request(),
            &config(),
            RetryScope::IncludeRateLimited,
            "test",
            &NoProgress,
        )
        .await
        .unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_configuration_error_not_retried() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Configuration("GROQ_API_KEY is not set".to_string())),
            Ok("ok".to_string()),
        ]);
        let err = send_with_retry(
            &gateway,
            &request(),
            &config(),
            RetryScope::IncludeRateLimited,
            "test",
            &NoProgress,
        )
        .await
        .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(gateway.requests().len(), 1);
    }
}
