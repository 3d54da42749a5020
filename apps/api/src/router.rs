use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::router::auth_routes;
use patient_cell::router::create_patient_router;
use record_cell::router::{patient_record_routes, record_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let patients = create_patient_router(state.clone()).merge(patient_record_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { "EHR API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/patients", patients)
        .nest("/records", record_routes(state))
}
