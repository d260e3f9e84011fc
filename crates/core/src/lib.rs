//! # Notes Core
//!
//! Core logic for turning free-text clinical notes into structured records:
//! - the fixed extraction prompt
//! - the call to the hosted chat completions API, with retries
//! - extraction of the ```json fenced block from the model reply
//! - shaping of the record into display tables
//!
//! **No API concerns**: HTTP routing, HTML pages and request handling belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod prompt;
pub mod service;
pub mod tables;

pub use config::NotesConfig;
pub use error::{ConfigError, ExtractionError, LlmError, NotesError, NotesResult};
pub use extraction::{extract, ExtractionResult, Medication, ServiceItem};
pub use llm::{ChatCompletionsClient, ChatModel};
pub use prompt::{build_messages, ChatMessage, Role};
pub use service::ExtractionService;
pub use tables::{ResultView, Table};
