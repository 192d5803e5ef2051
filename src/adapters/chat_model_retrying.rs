//! Retry wrapper for chat model calls.
//!
//! Transient provider failures (408, 429, 5xx, transport errors) are retried
//! with exponential backoff. A `Retry-After` hint from the provider replaces
//! the computed backoff. Everything else fails on the first attempt.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::domain::{AgentConfig, AppError};
use crate::ports::{ChatModel, ChatRequest, ChatResponse};

const MAX_DELAY: Duration = Duration::from_secs(30);
const MAX_BACKOFF_DOUBLINGS: u32 = 6;
const TRANSPORT_HINTS: [&str; 4] = ["timeout", "timed out", "connect", "temporar"];

/// Retry budget and delays for one model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AgentConfig) -> Self {
        let base_delay = Duration::from_millis(config.retry_delay_ms.max(1));
        Self { max_retries: config.max_retries, base_delay, max_delay: MAX_DELAY.max(base_delay) }
    }

    /// Delay before retry number `retry` (starting at 1).
    fn delay(&self, retry: u32, hint: Option<Duration>) -> Duration {
        if let Some(hint) = hint {
            return hint.min(self.max_delay);
        }
        let doublings = retry.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
        let backoff = self.base_delay.saturating_mul(1 << doublings).min(self.max_delay);
        (backoff + jitter(backoff)).min(self.max_delay)
    }
}

/// How a failed call should be handled.
#[derive(Debug, PartialEq, Eq)]
enum Failure {
    Transient { hint: Option<Duration> },
    Permanent,
}

fn classify(error: &AppError) -> Failure {
    let AppError::ChatApiError { message, status, retry_after_ms } = error else {
        return Failure::Permanent;
    };
    let transient = match *status {
        Some(code) => matches!(code, 408 | 429) || code >= 500,
        None => {
            let lower = message.to_ascii_lowercase();
            TRANSPORT_HINTS.iter().any(|hint| lower.contains(hint))
        }
    };
    if transient {
        Failure::Transient { hint: retry_after_ms.map(Duration::from_millis) }
    } else {
        Failure::Permanent
    }
}

/// Up to a quarter of `backoff`, so concurrent clients spread out.
fn jitter(backoff: Duration) -> Duration {
    let cap = backoff.as_millis() as u64 / 4;
    if cap == 0 {
        return Duration::ZERO;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::from(elapsed.subsec_nanos()))
        .unwrap_or(0);
    Duration::from_millis(nanos % cap)
}

/// [`ChatModel`] decorator applying a [`RetryPolicy`].
pub struct RetryingChatModel {
    inner: Box<dyn ChatModel>,
    policy: RetryPolicy,
}

impl RetryingChatModel {
    pub fn new(inner: Box<dyn ChatModel>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl ChatModel for RetryingChatModel {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let mut retries = 0;
        loop {
            let error = match self.inner.complete(request) {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };
            let Failure::Transient { hint } = classify(&error) else {
                return Err(error);
            };
            if retries >= self.policy.max_retries {
                return Err(error);
            }

            retries += 1;
            let delay = self.policy.delay(retries, hint);
            warn!(
                retry = retries,
                max_retries = self.policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "chat completion failed; retrying"
            );
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::ChatMessage;

    /// Replays scripted results and counts calls.
    struct ScriptedModel {
        calls: Arc<AtomicUsize>,
        script: Mutex<Vec<Result<ChatResponse, AppError>>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<ChatResponse, AppError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { calls: Arc::clone(&calls), script: Mutex::new(script) }, calls)
        }
    }

    impl ChatModel for ScriptedModel {
        fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(AppError::chat_api("server error", Some(500)));
            }
            script.remove(0)
        }
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hello")],
            tools: Vec::new(),
            temperature: None,
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn rate_limited(retry_after_ms: Option<u64>) -> AppError {
        AppError::ChatApiError {
            message: "Rate limited".to_string(),
            status: Some(429),
            retry_after_ms,
        }
    }

    #[test]
    fn recovers_after_transient_failures() {
        let (model, calls) = ScriptedModel::new(vec![
            Err(AppError::chat_api("server error", Some(502))),
            Err(rate_limited(None)),
            Ok(ChatResponse::text("done")),
        ]);
        let client = RetryingChatModel::new(Box::new(model), fast_policy(3));

        let response = client.complete(&request()).unwrap();
        assert_eq!(response.content.as_deref(), Some("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn max_retries_counts_calls_after_the_first() {
        let (model, calls) = ScriptedModel::new(Vec::new());
        let client = RetryingChatModel::new(Box::new(model), fast_policy(3));

        let err = client.complete(&request()).unwrap_err();
        assert!(matches!(err, AppError::ChatApiError { status: Some(500), .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn zero_retries_makes_a_single_call() {
        let (model, calls) = ScriptedModel::new(Vec::new());
        let client = RetryingChatModel::new(Box::new(model), fast_policy(0));

        assert!(client.complete(&request()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn client_errors_fail_fast() {
        let (model, calls) =
            ScriptedModel::new(vec![Err(AppError::chat_api("Incorrect API key", Some(401)))]);
        let client = RetryingChatModel::new(Box::new(model), fast_policy(3));

        let err = client.complete(&request()).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transport_errors_without_status_are_retried() {
        let (model, calls) = ScriptedModel::new(vec![
            Err(AppError::chat_api("HTTP request failed: connection refused", None)),
            Ok(ChatResponse::text("ok")),
        ]);
        let client = RetryingChatModel::new(Box::new(model), fast_policy(1));

        assert!(client.complete(&request()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retry_after_hint_replaces_backoff_up_to_cap() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_secs(5),
        };

        let Failure::Transient { hint } = classify(&rate_limited(Some(2000))) else {
            panic!("429 should be transient");
        };
        assert_eq!(hint, Some(Duration::from_millis(2000)));
        assert_eq!(policy.delay(1, hint), Duration::from_millis(2000));

        let Failure::Transient { hint } = classify(&rate_limited(Some(90_000))) else {
            panic!("429 should be transient");
        };
        assert_eq!(policy.delay(1, hint), Duration::from_secs(5));
    }

    #[test]
    fn backoff_doubles_within_jitter() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        };
        let third = policy.delay(3, None);
        assert!(third >= Duration::from_millis(400) && third < Duration::from_millis(500));
    }

    #[test]
    fn policy_reads_agent_config() {
        let config = crate::testing::test_config();
        let policy = RetryPolicy::from_config(&config.agent);
        assert_eq!(policy.max_retries, config.agent.max_retries);
        assert_eq!(policy.base_delay, Duration::from_millis(config.agent.retry_delay_ms));
    }
}
