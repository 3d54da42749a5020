use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AddPatientRequest, Patient, PatientError, UpdateBasicInfoRequest};
use crate::services::gate::TenantGate;

pub struct PatientService {
    supabase: Arc<SupabaseClient>,
    gate: TenantGate,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let gate = TenantGate::with_client(Arc::clone(&supabase));
        Self { supabase, gate }
    }

    /// All patients on the caller's roster, insertion order.
    pub async fn list_patients(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing patients for doctor {}", doctor_id);

        let path = format!("/rest/v1/patients?doctor_id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        let patients: Vec<Patient> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(patients)
    }

    /// Creates a patient owned by the calling doctor. Ownership is fixed
    /// here for the lifetime of the patient.
    pub async fn add_patient(
        &self,
        doctor_id: Uuid,
        request: AddPatientRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        request.validate()?;

        let patient_data = json!({
            "name": request.name,
            "doctor_id": doctor_id,
            "gender": request.gender,
            "weight": request.weight,
            "height": request.height,
            "blood_type": request.blood_type,
            "dob": request.dob
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/patients",
                Some(auth_token),
                Some(patient_data),
                Some(headers),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::Database("Failed to create patient".to_string()));
        }

        let patient: Patient = serde_json::from_value(result[0].clone())
            .map_err(|e| PatientError::Database(e.to_string()))?;

        info!("Patient {} created for doctor {}", patient.id, doctor_id);
        Ok(patient)
    }

    /// Gated single-patient fetch.
    pub async fn get_patient(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        Ok(self.gate.authorize_patient(patient_id, doctor_id, auth_token).await?)
    }

    /// Overwrites gender, weight, height and blood type. Name, date of
    /// birth and owner are immutable through this operation.
    pub async fn update_basic_info(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        request: UpdateBasicInfoRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        self.gate.authorize_patient(patient_id, doctor_id, auth_token).await?;
        request.validate()?;

        let update_data = json!({
            "gender": request.gender,
            "weight": request.weight,
            "height": request.height,
            "blood_type": request.blood_type
        });

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update_data),
                Some(headers),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::Database("Failed to update patient".to_string()));
        }

        let patient: Patient = serde_json::from_value(result[0].clone())
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(patient)
    }

    /// Deletes the patient. The store's foreign key cascades the delete
    /// to every medical record of the patient in the same transaction.
    pub async fn delete_patient(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<(), PatientError> {
        self.gate.authorize_patient(patient_id, doctor_id, auth_token).await?;

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted by doctor {}", patient_id, doctor_id);
        Ok(())
    }
}
