use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{GateError, Patient};

/// Access-control gate: binds every patient- and record-scoped operation
/// to the doctor that owns the patient. Stateless apart from the store
/// client; a pure authorization decision plus a fetch.
pub struct TenantGate {
    supabase: Arc<SupabaseClient>,
}

impl TenantGate {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Fetches the patient by id and checks ownership. Record-scoped
    /// operations resolve their record's `patient_id` and come through
    /// here too, so ownership is always derived via the patient join,
    /// never stored on the record.
    pub async fn authorize_patient(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Patient, GateError> {
        debug!("Authorizing doctor {} for patient {}", doctor_id, patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| GateError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(GateError::NotFound);
        }

        let patient: Patient = serde_json::from_value(result[0].clone())
            .map_err(|e| GateError::Database(e.to_string()))?;

        if patient.doctor_id != doctor_id {
            warn!(
                "Doctor {} denied access to patient {} owned by {}",
                doctor_id, patient_id, patient.doctor_id
            );
            return Err(GateError::Unauthorized);
        }

        Ok(patient)
    }
}
