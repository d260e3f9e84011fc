//! Fixed extraction prompt.
//!
//! Every request sends the same two system instructions followed by the clinician's note as the
//! user message. The second instruction pins the reply to a ```json fenced block with the schema
//! the extractor in [`crate::extraction`] understands.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message of an OpenAI-compatible chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Describes the assistant's role and the four categories to extract.
pub const ROLE_INSTRUCTION: &str = r#"You are a medical assistant capable of extracting structured details from unstructured clinical text provided by a doctor. Your task is to identify specific categories of information from the provided text precisely. Additionally, you need to identify and flag any unknown or unfamiliar terms that may need further clarification or special handling.

The categories you need to extract from the text are:
1. **Status**: Identify the patient's health status, such as "stable," "critical," "recovering," "improving," etc.
2. **Pharmacy**: Extract references to medication, prescriptions, or pharmacy-related details (e.g., medication names, dosages, directions).
3. **Services**: Extract any references to medical services, tests, or procedures mentioned (e.g., lab tests, imaging, surgeries).
4. **Unknown Words**: Flag any terms or phrases that are unfamiliar or do not fit within the recognized categories, indicating the need for further clarification or special handling.

Please note that further clarification or special handling may be needed for the patient's health status and the interpretation of their symptoms."#;

/// Pins the reply format: one ```json fenced block following the extraction schema.
pub const SCHEMA_INSTRUCTION: &str = r#"Based on the provided information, respond strictly in valid JSON format enclosed in triple backticks (`json`). Use the following schema:

```json
{
    "status": "stable",  // Replace with identified status.
    "pharmacy": {
        "medications": [
            {
                "name": "medicine name",  // Replace with actual medication name.
                "dosage": "dosage amount",  // Replace with dosage.
                "unit": "unit",  // Replace with unit (e.g., mg, ml).
                "ICD_code": "ICD code",  // Search and include the ICD code.
                "frequency": "frequency details"  // Replace with specific time periods (e.g., daily, twice a day).
            }
        ]
    },
    "services": {
        "tests": [
            // Include all prescribed tests, if any.
        ]
    },
    "unknown_words": [
        // Include any unfamiliar or unclear terms.
    ]
}
```

Ensure the response strictly adheres to this JSON schema."#;

/// Build the message list for one clinical note.
///
/// The note is passed through verbatim, including when it is empty.
pub fn build_messages(note: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ROLE_INSTRUCTION),
        ChatMessage::system(SCHEMA_INSTRUCTION),
        ChatMessage::user(note),
    ]
}
