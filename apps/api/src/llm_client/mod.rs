/// LLM Client — the single point of entry for completion-gateway calls.
///
/// No other module talks to the gateway directly. Replies are returned as raw
/// text; callers treat them as untrusted and extract what they need.
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Reply used when the gateway answers without any message content.
const EMPTY_REPLY: &str = "[]";
const BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A chat-style completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system + user exchange and returns the reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, or `"[]"` when the gateway sent nothing usable.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string())
    }
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.ai_timeout_secs))
                .build()?,
            endpoint: config.ai_gateway_url.clone(),
            api_key: config.ai_gateway_api_key.clone(),
            model: config.ai_model.clone(),
            max_retries: config.completion_max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes the gateway call. With `max_retries > 0`, 429, 5xx and transport
    /// errors are retried with jittered exponential backoff.
    async fn call(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut attempt = 0;
        loop {
            let error = match self.send_once(&request_body).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => e,
                Err(e) => return Err(e),
            };

            attempt += 1;
            let delay = backoff_delay(attempt, &mut rand::rng());
            warn!(
                "Completion attempt {} failed ({}), retrying after {}ms",
                attempt,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let text = serde_json::from_str::<ChatResponse>(&raw)?.into_text();
        debug!("Completion succeeded: reply_chars={}", text.len());
        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.call(system, user).await
    }
}

fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Http(_) => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        LlmError::Parse(_) => false,
    }
}

/// Exponential backoff (500ms, 1s, 2s, ...) plus up to one base delay of jitter.
fn backoff_delay(attempt: u32, rng: &mut impl Rng) -> Duration {
    let exp = BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let jitter = rng.random_range(0..=BACKOFF_BASE_MS);
    Duration::from_millis(exp + jitter)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_reply_text_from_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"[{\"course_id\":\"x\"}]"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text(), r#"[{"course_id":"x"}]"#);
    }

    #[test]
    fn test_reply_without_choices_defaults_to_empty_array() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.into_text(), "[]");
    }

    #[test]
    fn test_reply_with_null_content_defaults_to_empty_array() {
        let raw = r#"{"choices":[{"message":{"content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text(), "[]");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "google/gemini-2.5-flash",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "google/gemini-2.5-flash");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_retryable_statuses() {
        let api = |status| LlmError::Api {
            status,
            message: String::new(),
        };
        assert!(is_retryable(&api(429)));
        assert!(is_retryable(&api(503)));
        assert!(!is_retryable(&api(400)));
        assert!(!is_retryable(&api(402)));
    }

    #[test]
    fn test_backoff_grows_and_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for attempt in 1..=4u32 {
            let delay = backoff_delay(attempt, &mut rng).as_millis() as u64;
            let floor = BACKOFF_BASE_MS << (attempt - 1);
            assert!(delay >= floor, "attempt {attempt}: {delay} < {floor}");
            assert!(delay <= floor + BACKOFF_BASE_MS);
        }
    }

    // ── Against a local gateway stub ────────────────────────────────────────

    use crate::test_support::{closed_addr, test_config, StubServer};

    fn client_for(endpoint: String, max_retries: u32) -> LlmClient {
        let config = Config {
            ai_gateway_url: endpoint,
            completion_max_retries: max_retries,
            ..test_config()
        };
        LlmClient::new(&config).unwrap()
    }

    fn gateway_client(stub: &StubServer, max_retries: u32) -> LlmClient {
        client_for(format!("{}/v1/chat/completions", stub.url), max_retries)
    }

    #[tokio::test]
    async fn test_success_returns_reply_text() {
        let stub = StubServer::start(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"ranked"}}]}"#,
        )
        .await;
        let client = gateway_client(&stub, 0);

        let text = client.complete("sys", "usr").await.unwrap();

        assert_eq!(text, "ranked");
        assert_eq!(stub.hits(), 1);
        assert_eq!(
            stub.last_header("authorization").as_deref(),
            Some("Bearer gateway-key")
        );
    }

    #[tokio::test]
    async fn test_default_makes_single_attempt() {
        let stub = StubServer::start(503, "down").await;
        let client = gateway_client(&stub, 0);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, ref message } if message == "down"));
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors_up_to_limit() {
        let stub = StubServer::start(503, "down").await;
        let client = gateway_client(&stub, 1);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, .. }));
        assert_eq!(stub.hits(), 2);
    }

    #[tokio::test]
    async fn test_retries_rate_limit() {
        let stub = StubServer::start(429, "slow down").await;
        let client = gateway_client(&stub, 1);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 429, .. }));
        assert_eq!(stub.hits(), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let stub = StubServer::start(400, "bad request").await;
        let client = gateway_client(&stub, 3);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 400, .. }));
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_parse_error() {
        let stub = StubServer::start(200, "not json at all").await;
        let client = gateway_client(&stub, 2);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_http_error() {
        let addr = closed_addr().await;
        let client = client_for(format!("http://{addr}/v1/chat/completions"), 1);

        let err = client.complete("sys", "usr").await.unwrap_err();

        assert!(matches!(err, LlmError::Http(_)));
    }
}
