//! Outbound call to the hosted chat completions API.
//!
//! [`ChatModel`] is the seam between the pipeline and the network; [`ChatCompletionsClient`] is
//! the production implementation speaking the OpenAI-compatible protocol. Transient failures
//! (connection errors, timeouts, `429`, `5xx`) are retried with exponential backoff up to the
//! configured retry count; every other failure is returned immediately.

use crate::config::NotesConfig;
use crate::constants::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS};
use crate::error::{ConfigError, ConfigResult, LlmError, LlmResult};
use crate::prompt::ChatMessage;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Something that turns a chat message list into the model's reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl LlmError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Network(e) => e.is_connect() || e.is_timeout(),
            LlmError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            LlmError::Decode(_) | LlmError::NoChoices | LlmError::RetriesExhausted { .. } => false,
        }
    }
}

/// How often and how patiently a failed model call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or runs out of retries.
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, mut op: F) -> LlmResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LlmResult<T>>,
{
    let attempts = policy.max_retries + 1;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= attempts => {
                error!("model call failed after {} attempts: {}", attempts, e);
                return Err(LlmError::RetriesExhausted {
                    attempts,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = policy.backoff(attempt);
                warn!(
                    "model call attempt {} failed, retrying in {:?}: {}",
                    attempt, delay, e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    cfg: NotesConfig,
    retry: RetryPolicy,
}

impl ChatCompletionsClient {
    pub fn new(cfg: NotesConfig) -> ConfigResult<Self> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(2);
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::HttpClient)?;
        let retry = RetryPolicy::new(cfg.max_retries());

        Ok(Self { http, cfg, retry })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", self.cfg.api_key().expose());
        if let Ok(mut value) = HeaderValue::from_str(&bearer) {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn attempt(&self, url: &str, body: &ChatCompletionRequest<'_>) -> LlmResult<String> {
        let response = self
            .http
            .post(url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(LlmError::Decode)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::NoChoices)
    }
}

#[async_trait]
impl ChatModel for ChatCompletionsClient {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        let url = self.cfg.completions_url();
        let body = ChatCompletionRequest {
            model: self.cfg.model(),
            messages,
            temperature: self.cfg.temperature(),
            stream: false,
        };

        debug!(model = %self.cfg.model(), messages = messages.len(), "calling model API");
        let reply = with_retries(self.retry, || self.attempt(&url, &body)).await?;
        debug!(reply_len = reply.len(), "model API replied");

        Ok(reply)
    }
}
