use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::Doctor;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn with_store_url(url: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            ..TestConfig::default().to_app_config()
        }
    }
}

pub struct TestDoctor {
    pub id: Uuid,
    pub email: String,
}

impl Default for TestDoctor {
    fn default() -> Self {
        Self::new("doctor@example.com")
    }
}

impl TestDoctor {
    pub fn new(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
        }
    }

    pub fn to_doctor(&self) -> Doctor {
        Doctor {
            id: self.id,
            email: Some(self.email.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(doctor: &TestDoctor, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": doctor.id.to_string(),
            "email": doctor.email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(doctor: &TestDoctor, secret: &str) -> String {
        Self::create_test_token(doctor, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(doctor: &TestDoctor) -> String {
        Self::create_test_token(doctor, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned store rows for wiremock-backed tests.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn patient_row(patient_id: Uuid, doctor_id: Uuid, name: &str) -> Value {
        json!({
            "id": patient_id,
            "name": name,
            "doctor_id": doctor_id,
            "gender": "female",
            "weight": 62.5,
            "height": 170.0,
            "blood_type": "O+",
            "dob": "01-01-1990"
        })
    }

    pub fn record_row(
        record_id: Uuid,
        patient_id: Uuid,
        chief_complaint: &str,
        diagnosis: &str,
        created_at: &str,
    ) -> Value {
        json!({
            "id": record_id,
            "patient_id": patient_id,
            "chief_complaint": chief_complaint,
            "diagnosis": diagnosis,
            "medications": null,
            "allergies": null,
            "vital_signs": null,
            "treatment_plan": null,
            "medical_history": null,
            "family_history": null,
            "social_history": null,
            "prognosis": null,
            "created_at": created_at
        })
    }

    pub fn login_response(doctor: &TestDoctor, access_token: &str) -> Value {
        json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "test-refresh-token",
            "user": {
                "id": doctor.id,
                "email": doctor.email
            }
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_anon_key, "test-anon-key");
        assert!(!app_config.supabase_jwt_secret.is_empty());
    }

    #[test]
    fn test_doctor_creation() {
        let doctor = TestDoctor::new("doc@example.com");
        assert_eq!(doctor.email, "doc@example.com");

        let identity = doctor.to_doctor();
        assert_eq!(identity.email, Some(doctor.email.clone()));
        assert_eq!(identity.id, doctor.id);
    }

    #[test]
    fn test_jwt_token_creation() {
        let doctor = TestDoctor::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&doctor, secret, Some(1));

        assert!(token.contains('.'));
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_token_round_trip() {
        let doctor = TestDoctor::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&doctor, secret, Some(1));

        let validated = crate::jwt::validate_token(&token, secret).unwrap();
        assert_eq!(validated.id, doctor.id);
        assert_eq!(validated.email, Some(doctor.email.clone()));
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let doctor = TestDoctor::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&doctor, secret, Some(1));

        // Same token against a different secret must fail before the
        // subject is ever parsed.
        assert!(crate::jwt::validate_token(&token, "other-secret").is_err());
    }
}
