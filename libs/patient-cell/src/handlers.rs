use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::Doctor;
use shared_models::error::AppError;

use crate::models::{AddPatientRequest, UpdateBasicInfoRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patients = service.list_patients(doctor.id, auth.token()).await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn add_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Json(request): Json<AddPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.add_patient(doctor.id, request, auth.token()).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.get_patient(patient_id, doctor.id, auth.token()).await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_basic_info(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdateBasicInfoRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service
        .update_basic_info(patient_id, doctor.id, request, auth.token())
        .await?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    service.delete_patient(patient_id, doctor.id, auth.token()).await?;

    Ok(Json(json!({ "deleted": patient_id })))
}
