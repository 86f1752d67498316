//! Retry state machine for model service calls.
//!
//! One [`drive`] invocation owns the full lifecycle of a logical call:
//! attempt, classify the failure, back off exponentially on rate limiting,
//! reconstruct the client once on the first transport error, and terminate
//! in either the successful text or one of the fixed user-facing failure
//! strings. Callers always receive a string; no failure escapes this
//! boundary as an error value.
//!
//! The driver is generic over the attempt closure so the state machine is
//! exercised in tests without a network.

use std::time::Duration;

/// Terminal reply when the retry budget is exhausted by rate limiting.
pub const RATE_LIMITED_REPLY: &str =
    "The analysis service is temporarily rate-limited. Please try again in a moment.";

/// Terminal reply when the retry budget is exhausted by transport failures.
pub const UNAVAILABLE_REPLY: &str =
    "The analysis service is currently unavailable. Please try again later.";

/// Prefix of the terminal reply for non-recoverable failures; the failure
/// detail is appended.
pub const FATAL_PREFIX: &str = "Model request failed: ";

/// Whether a client reply is one of the fixed failure strings rather than
/// model output.
#[must_use]
pub fn is_failure_reply(reply: &str) -> bool {
    reply == RATE_LIMITED_REPLY || reply == UNAVAILABLE_REPLY || reply.starts_with(FATAL_PREFIX)
}

/// Configuration for retry behavior on model service calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Classified failure of a single attempt.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// The service signalled rate limiting; honour `retry_after` as a
    /// minimum wait when present.
    RateLimited { retry_after: Option<Duration> },
    /// Connection-level failure (DNS, TLS, refused, 5xx).
    Transport(String),
    /// Non-recoverable failure (bad request, malformed response body).
    Fatal(String),
}

/// What the driver asks of the next attempt.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttemptSpec {
    /// 1-based attempt number.
    pub number: u32,
    /// True when the previous attempt hit a transport error and the caller
    /// should reconstruct its connection before this one.
    pub fresh_client: bool,
}

/// Run the retry state machine to a terminal string.
pub(crate) async fn drive<F, Fut>(config: &RetryConfig, mut attempt: F) -> String
where
    F: FnMut(AttemptSpec) -> Fut,
    Fut: Future<Output = Result<String, AttemptError>>,
{
    let mut delay = config.base_delay;
    let mut reconnected = false;
    let mut fresh_client = false;
    let mut number = 0u32;

    loop {
        number += 1;
        let spec = AttemptSpec {
            number,
            fresh_client,
        };
        fresh_client = false;

        let error = match attempt(spec).await {
            Ok(text) => {
                tracing::debug!(attempt = number, "model call succeeded");
                return text;
            }
            Err(error) => error,
        };

        match error {
            AttemptError::Fatal(detail) => {
                tracing::warn!(attempt = number, %detail, "model call failed fatally");
                return format!("{FATAL_PREFIX}{detail}");
            }
            AttemptError::Transport(detail) if !reconnected => {
                // One immediate retry on a rebuilt connection before joining
                // the backoff loop.
                tracing::warn!(
                    attempt = number,
                    %detail,
                    "transport error; reconstructing client and retrying"
                );
                reconnected = true;
                fresh_client = true;
            }
            AttemptError::Transport(detail) => {
                if number >= config.max_attempts {
                    tracing::warn!(attempt = number, %detail, "retry budget exhausted");
                    return UNAVAILABLE_REPLY.to_string();
                }
                tracing::warn!(
                    attempt = number,
                    %detail,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "transport error; backing off"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
            }
            AttemptError::RateLimited { retry_after } => {
                if number >= config.max_attempts {
                    tracing::warn!(attempt = number, "retry budget exhausted while rate-limited");
                    return RATE_LIMITED_REPLY.to_string();
                }
                let wait = retry_after.map_or(delay, |hinted| hinted.max(delay));
                tracing::warn!(
                    attempt = number,
                    delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "rate-limited; backing off"
                );
                tokio::time::sleep(wait).await;
                delay = (delay * 2).min(config.max_delay);
            }
        }
    }
}
