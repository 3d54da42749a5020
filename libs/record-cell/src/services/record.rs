use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use patient_cell::models::Patient;
use patient_cell::services::TenantGate;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateRecordRequest, MedicalRecord, RecordError, UpdateRecordRequest};

pub struct RecordService {
    supabase: Arc<SupabaseClient>,
    gate: TenantGate,
}

impl RecordService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let gate = TenantGate::with_client(Arc::clone(&supabase));
        Self { supabase, gate }
    }

    async fn fetch_record(
        &self,
        record_id: Uuid,
        auth_token: &str,
    ) -> Result<MedicalRecord, RecordError> {
        let path = format!("/rest/v1/medical_records?id=eq.{}", record_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(RecordError::NotFound);
        }

        serde_json::from_value(result[0].clone()).map_err(|e| RecordError::Database(e.to_string()))
    }

    /// Records for one patient, newest first, with the patient joined in
    /// for display context. Gated on the patient.
    pub async fn list_records(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<(Patient, Vec<MedicalRecord>), RecordError> {
        let patient = self.gate.authorize_patient(patient_id, doctor_id, auth_token).await?;

        let path = format!(
            "/rest/v1/medical_records?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        let records: Vec<MedicalRecord> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok((patient, records))
    }

    /// Creates a visit record under a patient the caller owns. Nothing is
    /// written when validation fails; `created_at` is assigned here at
    /// write time.
    pub async fn add_record(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        request: CreateRecordRequest,
        auth_token: &str,
    ) -> Result<MedicalRecord, RecordError> {
        self.gate.authorize_patient(patient_id, doctor_id, auth_token).await?;
        request.validate()?;

        let record_data = json!({
            "patient_id": patient_id,
            "chief_complaint": request.chief_complaint,
            "diagnosis": request.diagnosis,
            "medications": request.medications,
            "allergies": request.allergies,
            "vital_signs": request.vital_signs,
            "treatment_plan": request.treatment_plan,
            "medical_history": request.medical_history,
            "family_history": request.family_history,
            "social_history": request.social_history,
            "prognosis": request.prognosis,
            "created_at": Utc::now().to_rfc3339()
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
                "/rest/v1/medical_records",
                Some(auth_token),
                Some(record_data),
                Some(headers),
            )
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(RecordError::Database("Failed to create medical record".to_string()));
        }

        let record: MedicalRecord = serde_json::from_value(result[0].clone())
            .map_err(|e| RecordError::Database(e.to_string()))?;

        info!("Medical record {} created for patient {}", record.id, patient_id);
        Ok(record)
    }

    /// Gated single-record fetch; the ownership check goes through the
    /// record's patient.
    pub async fn get_record(
        &self,
        record_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<(MedicalRecord, Patient), RecordError> {
        let record = self.fetch_record(record_id, auth_token).await?;
        let patient = self
            .gate
            .authorize_patient(record.patient_id, doctor_id, auth_token)
            .await?;

        Ok((record, patient))
    }

    /// Full overwrite of every mutable field. An omitted required field
    /// is written as an empty string, an omitted optional field as null.
    pub async fn update_record(
        &self,
        record_id: Uuid,
        doctor_id: Uuid,
        request: UpdateRecordRequest,
        auth_token: &str,
    ) -> Result<MedicalRecord, RecordError> {
        let record = self.fetch_record(record_id, auth_token).await?;
        self.gate
            .authorize_patient(record.patient_id, doctor_id, auth_token)
            .await?;

        debug!("Overwriting medical record {}", record_id);

        let update_data = json!({
            "chief_complaint": request.chief_complaint.unwrap_or_default(),
            "diagnosis": request.diagnosis.unwrap_or_default(),
            "medications": request.medications,
            "allergies": request.allergies,
            "vital_signs": request.vital_signs,
            "treatment_plan": request.treatment_plan,
            "medical_history": request.medical_history,
            "family_history": request.family_history,
            "social_history": request.social_history,
            "prognosis": request.prognosis
        });

        let path = format!("/rest/v1/medical_records?id=eq.{}", record_id);
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
            .map_err(|e| RecordError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(RecordError::Database("Failed to update medical record".to_string()));
        }

        serde_json::from_value(result[0].clone()).map_err(|e| RecordError::Database(e.to_string()))
    }

    /// Deletes one record after the ownership check through its patient.
    pub async fn delete_record(
        &self,
        record_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<(), RecordError> {
        let record = self.fetch_record(record_id, auth_token).await?;
        self.gate
            .authorize_patient(record.patient_id, doctor_id, auth_token)
            .await?;

        let path = format!("/rest/v1/medical_records?id=eq.{}", record_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(RecordError::NotFound);
        }

        info!("Medical record {} deleted by doctor {}", record_id, doctor_id);
        Ok(())
    }
}
