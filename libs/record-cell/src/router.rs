use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

/// Patient-scoped listing and creation; merged into the `/patients`
/// subtree by the application router.
pub fn patient_record_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{id}/records", get(list_records))
        .route("/{id}/records", post(add_record))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

/// Record-scoped access, nested at `/records`.
pub fn record_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{id}", get(get_record))
        .route("/{id}", put(update_record))
        .route("/{id}", delete(delete_record))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
