use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::jwt;

use crate::models::{LoginRequest, RegisterRequest};

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Creates a doctor account. Credential hashing and storage are handled
/// by the auth collaborator, never here.
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    debug!("Registering doctor account: {}", request.email);

    let client = SupabaseClient::new(&config);

    let response: Value = client
        .request(
            Method::POST,
            "/auth/v1/signup",
            None,
            Some(json!({
                "email": request.email,
                "password": request.password
            })),
        )
        .await
        .map_err(|e| AppError::BadRequest(format!("Registration failed: {}", e)))?;

    info!("Doctor account created: {}", request.email);

    Ok(Json(json!({
        "message": "Account created successfully! Please log in.",
        "doctor": response.get("user").cloned().unwrap_or(Value::Null)
    })))
}

/// Authentication hook: credentials in, session token out. Verification
/// is delegated to the auth collaborator; bad credentials surface as a
/// single AUTH_FAILURE message.
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    debug!("Login attempt for {}", request.email);

    let client = SupabaseClient::new(&config);

    let response: Value = client
        .request(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            None,
            Some(json!({
                "email": request.email,
                "password": request.password
            })),
        )
        .await
        .map_err(|_| AppError::Auth("Invalid email or password".to_string()))?;

    let access_token = response
        .get("access_token")
        .and_then(|t| t.as_str())
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
        "doctor": response.get("user").cloned().unwrap_or(Value::Null)
    })))
}

/// Session hook exposed as an endpoint: bearer token in, doctor identity
/// out.
pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.supabase_jwt_secret) {
        Ok(doctor) => {
            let response = TokenResponse {
                valid: true,
                doctor_id: doctor.id,
                email: doctor.email,
            };

            Ok(Json(response))
        }
        Err(err) => Err(AppError::Auth(err)),
    }
}
