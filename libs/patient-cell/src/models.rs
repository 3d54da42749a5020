use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

/// A person under the care of exactly one doctor. `doctor_id` is set at
/// creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub doctor_id: Uuid,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    /// Date of birth in DD-MM-YYYY display form.
    pub dob: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPatientRequest {
    pub name: String,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
    pub dob: String,
}

impl AddPatientRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        if self.name.trim().is_empty() {
            return Err(PatientError::Validation("Patient name is required".to_string()));
        }
        if NaiveDate::parse_from_str(&self.dob, "%d-%m-%Y").is_err() {
            return Err(PatientError::Validation(
                "Date of birth must be in DD-MM-YYYY format".to_string(),
            ));
        }
        validate_vitals(self.weight, self.height, self.blood_type.as_deref())
    }
}

/// Overwrites exactly the four mutable basic-info fields. `name`, `dob`
/// and `doctor_id` cannot be changed through this request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBasicInfoRequest {
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_type: Option<String>,
}

impl UpdateBasicInfoRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        validate_vitals(self.weight, self.height, self.blood_type.as_deref())
    }
}

fn validate_vitals(
    weight: Option<f64>,
    height: Option<f64>,
    blood_type: Option<&str>,
) -> Result<(), PatientError> {
    for (field, value) in [("weight", weight), ("height", height)] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(PatientError::Validation(format!(
                    "{} must be a number",
                    field
                )));
            }
        }
    }
    if let Some(bt) = blood_type {
        if bt.len() > 3 {
            return Err(PatientError::Validation(
                "Blood type must be at most 3 characters".to_string(),
            ));
        }
    }
    Ok(())
}

/// Outcome of the tenant-isolation check. `NotFound` and `Unauthorized`
/// are deliberately distinct; unifying them for cross-tenant privacy is a
/// one-line change here.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Patient not found")]
    NotFound,

    #[error("Unauthorized access to patient")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Unauthorized access to patient")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<GateError> for PatientError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::NotFound => PatientError::NotFound,
            GateError::Unauthorized => PatientError::Unauthorized,
            GateError::Database(msg) => PatientError::Database(msg),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Unauthorized => AppError::Forbidden(err.to_string()),
            PatientError::Validation(msg) => AppError::ValidationError(msg),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn add_patient_requires_name() {
        let request = AddPatientRequest {
            name: "  ".to_string(),
            gender: None,
            weight: None,
            height: None,
            blood_type: None,
            dob: "01-01-1990".to_string(),
        };
        assert_matches!(request.validate(), Err(PatientError::Validation(_)));
    }

    #[test]
    fn add_patient_rejects_bad_dob() {
        let request = AddPatientRequest {
            name: "Alice".to_string(),
            gender: None,
            weight: None,
            height: None,
            blood_type: None,
            dob: "1990-01-01".to_string(),
        };
        assert_matches!(request.validate(), Err(PatientError::Validation(_)));
    }

    #[test]
    fn add_patient_rejects_long_blood_type() {
        let request = AddPatientRequest {
            name: "Alice".to_string(),
            gender: None,
            weight: None,
            height: None,
            blood_type: Some("AB+++".to_string()),
            dob: "01-01-1990".to_string(),
        };
        assert_matches!(request.validate(), Err(PatientError::Validation(_)));
    }

    #[test]
    fn add_patient_rejects_non_finite_weight() {
        let request = AddPatientRequest {
            name: "Alice".to_string(),
            gender: None,
            weight: Some(f64::NAN),
            height: None,
            blood_type: None,
            dob: "01-01-1990".to_string(),
        };
        assert_matches!(request.validate(), Err(PatientError::Validation(_)));
    }

    #[test]
    fn add_patient_accepts_any_finite_weight() {
        let request = AddPatientRequest {
            name: "Alice".to_string(),
            gender: None,
            weight: Some(0.5),
            height: Some(210.0),
            blood_type: None,
            dob: "01-01-1990".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn add_patient_accepts_minimal_fields() {
        let request = AddPatientRequest {
            name: "Alice".to_string(),
            gender: None,
            weight: None,
            height: None,
            blood_type: None,
            dob: "01-01-1990".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
