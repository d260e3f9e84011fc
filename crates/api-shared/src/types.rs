//! JSON request and response bodies.

use notes_core::{ExtractionResult, Medication, ServiceItem};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A clinical note to extract. The same field name as the HTML form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractReq {
    pub patient_prompt: String,
}

/// One medication of an extraction. Absent fields are `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicationRes {
    pub name: String,
    pub dosage: String,
    pub unit: String,
    pub icd_code: String,
    pub frequency: String,
}

/// One entry of the services data, labelled with the key the model listed it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceItemRes {
    pub category: String,
    pub item: String,
}

/// Structured record extracted from a clinical note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractRes {
    /// Patient status, `"Not Available"` when the model gave none
    pub status: String,
    pub medications: Vec<MedicationRes>,
    pub tests: Vec<String>,
    /// Every services entry, `tests` included
    pub services: Vec<ServiceItemRes>,
    pub unknown_terms: Vec<String>,
}

impl From<Medication> for MedicationRes {
    fn from(med: Medication) -> Self {
        Self {
            name: med.name,
            dosage: med.dosage,
            unit: med.unit,
            icd_code: med.icd_code,
            frequency: med.frequency,
        }
    }
}

impl From<ServiceItem> for ServiceItemRes {
    fn from(service: ServiceItem) -> Self {
        Self {
            category: service.category,
            item: service.item,
        }
    }
}

impl From<ExtractionResult> for ExtractRes {
    fn from(result: ExtractionResult) -> Self {
        Self {
            status: result.status,
            medications: result.medications.into_iter().map(Into::into).collect(),
            tests: result.tests,
            services: result.services.into_iter().map(Into::into).collect(),
            unknown_terms: result.unknown_terms,
        }
    }
}
