//! OpenAI-compatible chat completion client.
//!
//! Maps HTTP outcomes onto the retry state machine's failure classes:
//! 429 (with `Retry-After`) is rate limiting, connection errors and 5xx are
//! transport failures, everything else non-success is fatal. Response
//! bodies are parsed with serde; a body that does not match the completion
//! shape is fatal, never silently coerced.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tide_config::ModelConfig;

use crate::retry::{AttemptError, RetryConfig, drive};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Resilient client for the external model service.
///
/// Stateless apart from its connection pool; safe to share across a whole
/// session. Every call terminates in a string, either model output or one
/// of the fixed failure replies, so no model failure can abort a pipeline
/// stage as an exception.
pub struct ModelClient {
    http: reqwest::Client,
    config: ModelConfig,
    retry: RetryConfig,
}

impl ModelClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        let retry = RetryConfig {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        };
        Self {
            http: build_http(&config),
            config,
            retry,
        }
    }

    /// Issue one logical completion call.
    ///
    /// Runs the full retry state machine; the returned string is either the
    /// model's reply or one of the fixed failure strings
    /// ([`crate::RATE_LIMITED_REPLY`], [`crate::UNAVAILABLE_REPLY`], or a
    /// [`crate::FATAL_PREFIX`]-prefixed message).
    pub async fn call(&self, system_prompt: &str, user_prompt: &str) -> String {
        let mut http = self.http.clone();
        drive(&self.retry, |spec| {
            if spec.fresh_client {
                http = build_http(&self.config);
            }
            let http = http.clone();
            let config = self.config.clone();
            let system = system_prompt.to_string();
            let user = user_prompt.to_string();
            async move { attempt_once(&http, &config, &system, &user).await }
        })
        .await
    }
}

fn build_http(config: &ModelConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("tidepool/0.1")
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .unwrap_or_default()
}

async fn attempt_once(
    http: &reqwest::Client,
    config: &ModelConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String, AttemptError> {
    let body = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let url = format!(
        "{}/chat/completions",
        config.base_url.trim_end_matches('/')
    );
    let response = http
        .post(url)
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|error| AttemptError::Transport(error.to_string()))?;

    let response = check_response(response).await?;

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|error| AttemptError::Fatal(format!("malformed completion response: {error}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or_else(|| AttemptError::Fatal("completion response had no choices".to_string()))
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`AttemptError::RateLimited`] with
///   `Retry-After` header parsing.
/// - **5xx** → [`AttemptError::Transport`] (the service is unhealthy, worth
///   retrying).
/// - **Other non-success status** → [`AttemptError::Fatal`] with status code
///   and response body.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AttemptError> {
    let status = response.status();
    if status == 429 {
        let retry_after = parse_retry_after(&response);
        return Err(AttemptError::RateLimited { retry_after });
    }
    if status.is_server_error() {
        return Err(AttemptError::Transport(format!(
            "service error ({})",
            status.as_u16()
        )));
    }
    if !status.is_success() {
        return Err(AttemptError::Fatal(format!(
            "API error ({}): {}",
            status.as_u16(),
            response.text().await.unwrap_or_default()
        )));
    }
    Ok(response)
}

/// Parse the `Retry-After` header as whole seconds, when present.
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    const FIXTURE: &str = r#"{
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "SELECT year FROM fact_job_postings_cleaned"
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 120, "completion_tokens": 18}
    }"#;

    #[test]
    fn parse_completion_fixture() {
        let parsed: ChatResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content,
            "SELECT year FROM fact_job_postings_cleaned"
        );
    }

    #[test]
    fn completion_without_choices_parses_to_empty() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn request_serializes_expected_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are terse.",
                },
                ChatMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            temperature: 0.0,
            max_tokens: 256,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 256);
    }

    #[tokio::test]
    async fn check_response_rate_limited_with_header() {
        let response = mock_response_with_retry_after(429, "30");
        let error = check_response(response).await.unwrap_err();
        match error {
            AttemptError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_response_rate_limited_without_header() {
        let error = check_response(mock_response(429)).await.unwrap_err();
        assert!(matches!(
            error,
            AttemptError::RateLimited { retry_after: None }
        ));
    }

    #[tokio::test]
    async fn check_response_server_error_is_transport() {
        let error = check_response(mock_response(503)).await.unwrap_err();
        assert!(matches!(error, AttemptError::Transport(_)));
    }

    #[tokio::test]
    async fn check_response_client_error_is_fatal() {
        let error = check_response(mock_response(400)).await.unwrap_err();
        assert!(matches!(error, AttemptError::Fatal(_)));
    }

    #[tokio::test]
    async fn check_response_success_passes_through() {
        assert!(check_response(mock_response(200)).await.is_ok());
    }
}
