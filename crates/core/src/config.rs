//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the request handlers
//! and the model client. Nothing reads process-wide environment variables while a request is
//! being handled, which keeps handlers deterministic in tests.

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::error::{ConfigError, ConfigResult};
use notes_types::SecretText;
use std::time::Duration;

/// Name of the environment variable holding the model API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Name of the environment variable overriding the model API base URL.
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";

/// Model API configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct NotesConfig {
    api_key: SecretText,
    base_url: String,
    model: String,
    temperature: f32,
    max_retries: u32,
    request_timeout: Option<Duration>,
}

impl NotesConfig {
    /// Create a `NotesConfig` with the fixed model settings.
    ///
    /// `base_url` must use the `http` or `https` scheme and must not embed credentials; a
    /// trailing slash is dropped.
    pub fn new(api_key: SecretText, base_url: &str) -> ConfigResult<Self> {
        let base_url = validate_base_url(base_url)?;

        Ok(Self {
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: None,
        })
    }

    /// Resolve configuration from the raw values of `GROQ_API_KEY` and `GROQ_BASE_URL`.
    ///
    /// Takes the values rather than reading the environment so callers decide where they come
    /// from. A missing or blank base URL falls back to the hosted default.
    pub fn from_env_values(
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> ConfigResult<Self> {
        let api_key = api_key.ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let api_key = SecretText::new(api_key).map_err(|_| ConfigError::EmptyVar(API_KEY_VAR))?;

        let base_url = base_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::new(api_key, &base_url)
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_values(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(BASE_URL_VAR).ok(),
        )
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &SecretText {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

fn validate_base_url(url: &str) -> ConfigResult<String> {
    let cleaned = url.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: cleaned.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(cleaned).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got {}",
            parsed.scheme()
        )));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("URL must not contain credentials".into()));
    }

    Ok(cleaned.to_string())
}
