use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::router::auth_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreRows, TestConfig, TestDoctor};

async fn create_test_app(config: AppConfig) -> Router {
    auth_routes(Arc::new(config))
}

#[tokio::test]
async fn test_validate_token_endpoint() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config.clone()).await;

    let doctor = TestDoctor::new("test@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("POST")
        .uri("/validate")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["valid"], true);
    assert_eq!(json_response["doctor_id"], doctor.id.to_string());
    assert_eq!(json_response["email"], doctor.email);
}

#[tokio::test]
async fn test_validate_token_endpoint_unauthorized() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(config).await;

    let request = Request::builder()
        .method("POST")
        .uri("/validate")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_endpoint_bad_credentials() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());
    let app = create_test_app(config).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockStoreRows::error_response("Invalid login credentials", "invalid_grant"),
        ))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "doctor@example.com", "password": "nope" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login_flow() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestDoctor::new("d1@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": doctor.id, "email": doctor.email }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockStoreRows::login_response(&doctor, &token)),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(config.clone()).await;
    let register_request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "d1@example.com", "password": "secret" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(register_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = create_test_app(config).await;
    let login_request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "d1@example.com", "password": "secret" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(login_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json_response["access_token"], token);
}
