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

use crate::models::{CreateRecordRequest, UpdateRecordRequest};
use crate::services::RecordService;

#[axum::debug_handler]
pub async fn list_records(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&config);

    let (patient, records) = service
        .list_records(patient_id, doctor.id, auth.token())
        .await?;

    Ok(Json(json!({
        "patient": patient,
        "records": records,
        "total": records.len()
    })))
}

#[axum::debug_handler]
pub async fn add_record(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&config);

    let record = service
        .add_record(patient_id, doctor.id, request, auth.token())
        .await?;

    Ok(Json(json!(record)))
}

#[axum::debug_handler]
pub async fn get_record(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&config);

    let (record, patient) = service.get_record(record_id, doctor.id, auth.token()).await?;

    Ok(Json(json!({
        "record": record,
        "patient": patient
    })))
}

#[axum::debug_handler]
pub async fn update_record(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(record_id): Path<Uuid>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&config);

    let record = service
        .update_record(record_id, doctor.id, request, auth.token())
        .await?;

    Ok(Json(json!(record)))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(doctor): Extension<Doctor>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&config);

    service.delete_record(record_id, doctor.id, auth.token()).await?;

    Ok(Json(json!({ "deleted": record_id })))
}
