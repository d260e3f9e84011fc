//! Structured record extraction from a model reply.
//!
//! The model is asked to answer with a single ```json fenced block. Extraction finds the first
//! such block, parses it against the reply schema, and fills in the documented defaults. A reply
//! without the block fails with a specific [`ExtractionError`] rather than producing an empty
//! record.

use crate::constants::{
    FENCE_CLOSE, FIELD_NOT_AVAILABLE, JSON_FENCE_OPEN, SERVICES_CATEGORY, STATUS_NOT_AVAILABLE,
    TESTS_KEY,
};
use crate::error::ExtractionError;
use serde::Deserialize;
use serde_json::Value;

/// A medication row pulled from the reply. Missing fields hold `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub unit: String,
    pub icd_code: String,
    pub frequency: String,
}

/// One entry of the services data, under the key it was listed with.
///
/// A services value that is not an object is listed under `"services"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceItem {
    pub category: String,
    pub item: String,
}

/// The structured record extracted from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub status: String,
    pub medications: Vec<Medication>,
    pub tests: Vec<String>,
    /// Everything under `services`, `tests` included
    pub services: Vec<ServiceItem>,
    pub unknown_terms: Vec<String>,
}

/// Top-level shape of the fenced JSON document.
///
/// Only `pharmacy.medications` has a fixed structure; every other field is taken in whatever
/// shape the model produced and rendered as text.
#[derive(Debug, Deserialize)]
struct ReplyDocument {
    status: Option<Value>,
    pharmacy: Option<PharmacySection>,
    services: Option<Value>,
    unknown_words: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PharmacySection {
    medications: Option<Vec<MedicationEntry>>,
}

#[derive(Debug, Deserialize)]
struct MedicationEntry {
    name: Option<Value>,
    dosage: Option<Value>,
    unit: Option<Value>,
    #[serde(rename = "ICD_code")]
    icd_code: Option<Value>,
    frequency: Option<Value>,
}

/// Strings as-is, anything else as compact JSON text (`500`, `["a","b"]`).
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Array elements one per entry, `null` as nothing, any other value as a single entry.
fn values_text(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(value_text).collect(),
        other => vec![value_text(other)],
    }
}

fn text_or(field: Option<Value>, default: &str) -> String {
    match field {
        None | Some(Value::Null) => default.to_string(),
        Some(value) => value_text(value),
    }
}

fn tests_of(services: &Value) -> Vec<String> {
    match services {
        Value::Object(map) => map.get(TESTS_KEY).cloned().map(values_text).unwrap_or_default(),
        Value::Array(_) => values_text(services.clone()),
        _ => Vec::new(),
    }
}

fn service_items(services: Value) -> Vec<ServiceItem> {
    match services {
        Value::Object(map) => map
            .into_iter()
            .flat_map(|(category, value)| {
                values_text(value).into_iter().map(move |item| ServiceItem {
                    category: category.clone(),
                    item,
                })
            })
            .collect(),
        other => values_text(other)
            .into_iter()
            .map(|item| ServiceItem {
                category: SERVICES_CATEGORY.to_string(),
                item,
            })
            .collect(),
    }
}

impl From<MedicationEntry> for Medication {
    fn from(entry: MedicationEntry) -> Self {
        Self {
            name: text_or(entry.name, FIELD_NOT_AVAILABLE),
            dosage: text_or(entry.dosage, FIELD_NOT_AVAILABLE),
            unit: text_or(entry.unit, FIELD_NOT_AVAILABLE),
            icd_code: text_or(entry.icd_code, FIELD_NOT_AVAILABLE),
            frequency: text_or(entry.frequency, FIELD_NOT_AVAILABLE),
        }
    }
}

impl From<ReplyDocument> for ExtractionResult {
    fn from(doc: ReplyDocument) -> Self {
        let medications = doc
            .pharmacy
            .and_then(|p| p.medications)
            .unwrap_or_default()
            .into_iter()
            .map(Medication::from)
            .collect();
        let services = doc.services.unwrap_or(Value::Null);

        Self {
            status: text_or(doc.status, STATUS_NOT_AVAILABLE),
            medications,
            tests: tests_of(&services),
            services: service_items(services),
            unknown_terms: doc.unknown_words.map(values_text).unwrap_or_default(),
        }
    }
}

/// Locate the first ```json fenced block and return its trimmed content.
///
/// The block runs from the opening marker to the next closing fence.
pub fn locate_json_block(reply: &str) -> Result<&str, ExtractionError> {
    let open = reply
        .find(JSON_FENCE_OPEN)
        .ok_or(ExtractionError::MissingFence)?;
    let body_start = open + JSON_FENCE_OPEN.len();
    let body_len = reply[body_start..]
        .find(FENCE_CLOSE)
        .ok_or(ExtractionError::UnterminatedFence)?;

    Ok(reply[body_start..body_start + body_len].trim())
}

/// Parse a JSON document in the reply schema into an [`ExtractionResult`].
pub fn parse_json_block(block: &str) -> Result<ExtractionResult, ExtractionError> {
    let doc: ReplyDocument = serde_json::from_str(block)?;
    Ok(doc.into())
}

/// Extract the structured record from a raw model reply.
pub fn extract(reply: &str) -> Result<ExtractionResult, ExtractionError> {
    let block = locate_json_block(reply)?;
    let result = parse_json_block(block)?;

    tracing::debug!(
        medications = result.medications.len(),
        tests = result.tests.len(),
        services = result.services.len(),
        unknown_terms = result.unknown_terms.len(),
        "extracted record from model reply"
    );

    Ok(result)
}
