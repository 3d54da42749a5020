use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use patient_cell::models::GateError;
use shared_models::error::AppError;

/// One clinical visit entry. The owning doctor is never stored here; it
/// is derived through `patient_id` on every access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub vital_signs: Option<String>,
    pub treatment_plan: Option<String>,
    pub medical_history: Option<String>,
    pub family_history: Option<String>,
    pub social_history: Option<String>,
    pub prognosis: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub chief_complaint: String,
    pub diagnosis: String,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub vital_signs: Option<String>,
    pub treatment_plan: Option<String>,
    pub medical_history: Option<String>,
    pub family_history: Option<String>,
    pub social_history: Option<String>,
    pub prognosis: Option<String>,
}

impl CreateRecordRequest {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.chief_complaint.trim().is_empty() || self.diagnosis.trim().is_empty() {
            return Err(RecordError::Validation(
                "Chief complaint and diagnosis are required fields".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full-overwrite update: every mutable field is written from this
/// request, and a field omitted here is cleared on the stored record.
/// A partial-merge variant would be a separate operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub chief_complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub vital_signs: Option<String>,
    pub treatment_plan: Option<String>,
    pub medical_history: Option<String>,
    pub family_history: Option<String>,
    pub social_history: Option<String>,
    pub prognosis: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Medical record not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Unauthorized access to medical record")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<GateError> for RecordError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::NotFound => RecordError::PatientNotFound,
            GateError::Unauthorized => RecordError::Unauthorized,
            GateError::Database(msg) => RecordError::Database(msg),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound | RecordError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            RecordError::Unauthorized => AppError::Forbidden(err.to_string()),
            RecordError::Validation(msg) => AppError::ValidationError(msg),
            RecordError::Database(msg) => AppError::Database(msg),
        }
    }
}
