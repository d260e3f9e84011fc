/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
    #[error("{0} cannot be empty")]
    EmptyVar(&'static str),
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

/// Errors raised by the outbound model call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("failed to reach model API: {0}")]
    Network(reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode model API response: {0}")]
    Decode(reqwest::Error),
    #[error("model API returned no choices")]
    NoChoices,
    #[error("model call failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },
}

/// Errors raised while pulling the structured record out of a model reply.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("model reply contains no ```json fenced block")]
    MissingFence,
    #[error("```json fenced block in model reply is not closed")]
    UnterminatedFence,
    #[error("fenced block is not a valid extraction record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of the note-to-record pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("model error: {0}")]
    Llm(#[from] LlmError),
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type LlmResult<T> = std::result::Result<T, LlmError>;
pub type NotesResult<T> = std::result::Result<T, NotesError>;
