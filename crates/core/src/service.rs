//! Note-to-record pipeline: prompt, model call, extraction.

use crate::error::NotesResult;
use crate::extraction::{extract, ExtractionResult};
use crate::llm::ChatModel;
use crate::prompt::build_messages;
use std::sync::Arc;

/// Runs one clinical note through the model and extracts the structured record.
#[derive(Clone)]
pub struct ExtractionService {
    model: Arc<dyn ChatModel>,
}

impl ExtractionService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Build the prompt for `note`, ask the model, and extract the record from its reply.
    ///
    /// # Errors
    /// Returns `NotesError::Llm` if the model call fails after retries, or
    /// `NotesError::Extraction` if the reply has no usable ```json block.
    pub async fn extract_note(&self, note: &str) -> NotesResult<ExtractionResult> {
        tracing::info!(note_len = note.len(), "extracting clinical note");

        let messages = build_messages(note);
        let reply = self.model.complete(&messages).await?;
        let result = extract(&reply).inspect_err(|e| {
            tracing::warn!(reply_len = reply.len(), "unusable model reply: {}", e);
        })?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, LlmError, LlmResult, NotesError};
    use crate::prompt::{ChatMessage, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed reply and records the messages it was sent.
    struct ScriptedModel {
        reply: Option<String>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            self.reply.clone().ok_or(LlmError::NoChoices)
        }
    }

    #[tokio::test]
    async fn extracts_record_from_model_reply() {
        let model = Arc::new(ScriptedModel::replying(
            "```json\n{\"status\":\"critical\",\"unknown_words\":[\"qxz\"]}\n```",
        ));
        let service = ExtractionService::new(model.clone());

        let result = service.extract_note("Patient critical, qxz noted").await.unwrap();
        assert_eq!(result.status, "critical");
        assert_eq!(result.unknown_terms, vec!["qxz"]);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].role, Role::User);
        assert_eq!(seen[2].content, "Patient critical, qxz noted");
    }

    #[tokio::test]
    async fn model_failure_is_llm_error() {
        let service = ExtractionService::new(Arc::new(ScriptedModel::failing()));
        let err = service.extract_note("note").await.unwrap_err();
        assert!(matches!(err, NotesError::Llm(LlmError::NoChoices)));
    }

    #[tokio::test]
    async fn reply_without_fence_is_extraction_error() {
        let service =
            ExtractionService::new(Arc::new(ScriptedModel::replying("I cannot help with that.")));
        let err = service.extract_note("note").await.unwrap_err();
        assert!(matches!(
            err,
            NotesError::Extraction(ExtractionError::MissingFence)
        ));
    }
}
