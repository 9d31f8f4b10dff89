/// Minimal client for an OpenAI-compatible `chat/completions` endpoint.
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Transport settings for the chat completion endpoint.
#[derive(Clone)]
pub struct OpenAiClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl fmt::Debug for OpenAiClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff", &self.initial_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("max_error_body_bytes", &self.max_error_body_bytes)
            .finish()
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl OpenAiClientConfig {
    /// Settings for `api_key` with the optional overrides `OPENAI_BASE_URL`,
    /// `OPENAI_TIMEOUT_SECS`, `OPENAI_MAX_RETRIES`, `OPENAI_RETRY_INITIAL_MS`,
    /// `OPENAI_RETRY_MAX_MS` and `OPENAI_MAX_ERROR_BODY_BYTES`.
    pub fn from_env(api_key: String) -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(env_parse("OPENAI_TIMEOUT_SECS").unwrap_or(30)),
            max_retries: env_parse("OPENAI_MAX_RETRIES").unwrap_or(2),
            initial_backoff: Duration::from_millis(
                env_parse("OPENAI_RETRY_INITIAL_MS").unwrap_or(200),
            ),
            max_backoff: Duration::from_millis(env_parse("OPENAI_RETRY_MAX_MS").unwrap_or(5_000)),
            max_error_body_bytes: env_parse("OPENAI_MAX_ERROR_BODY_BYTES").unwrap_or(8 * 1024),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAiClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

impl OpenAiClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            OpenAiClientError::Upstream { status, .. }
            | OpenAiClientError::UpstreamBody { status, .. } => Some(*status),
            OpenAiClientError::Request(e) => e.status(),
            OpenAiClientError::InvalidJson(_) => None,
        }
    }

    /// Worth another attempt: connection trouble or a 5xx. Rate limiting (429) is
    /// surfaced to the user instead.
    fn is_transient(&self) -> bool {
        match self {
            OpenAiClientError::Request(e) => e.is_connect() || e.is_request() || e.is_body(),
            OpenAiClientError::Upstream { status, .. }
            | OpenAiClientError::UpstreamBody { status, .. } => status.is_server_error(),
            OpenAiClientError::InvalidJson(_) => false,
        }
    }
}

pub struct OpenAiClient {
    config: OpenAiClientConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, OpenAiClientError> {
        let http = reqwest::Client::builder()
            .user_agent("fitsupp/advisor")
            .build()?;
        Ok(Self { config, http })
    }

    /// POST the request, retrying transient failures with capped exponential backoff.
    pub async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let mut attempt = 0;
        loop {
            match self.send_once(&url, request).await {
                Err(e) if attempt < self.config.max_retries && e.is_transient() => {
                    let delay =
                        retry_delay(self.config.initial_backoff, self.config.max_backoff, attempt);
                    attempt += 1;
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiClientError> {
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body = match resp.bytes().await {
            Ok(bytes) => {
                let end = bytes.len().min(self.config.max_error_body_bytes);
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            }
            Err(e) => {
                warn!(error = %e, "could not read upstream error body");
                String::new()
            }
        };
        Err(upstream_error(status, &body))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

fn upstream_error(status: StatusCode, body: &str) -> OpenAiClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => OpenAiClientError::Upstream {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string()),
        },
        Err(_) => OpenAiClientError::UpstreamBody {
            status,
            body: body.to_string(),
        },
    }
}

/// `initial * 2^attempt`, capped at `max`, plus up to a quarter of that in jitter.
fn retry_delay(initial: Duration, max: Duration, attempt: u32) -> Duration {
    let capped = initial
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(max);
    let spread_ms = (capped.as_millis() as u64 / 4).max(1);
    capped + Duration::from_millis(clock_jitter(spread_ms))
}

fn clock_jitter(bound: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (bound + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

/// The parts of a completion the advisor reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub total_tokens: Option<u64>,
}
