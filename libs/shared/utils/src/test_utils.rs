use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;

use crate::jwt::mint_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub data_api_url: String,
    pub stripe_api_base: String,
    pub cloudinary_api_base: String,
    pub upload_dir: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            data_api_url: "http://localhost:9100".to_string(),
            stripe_api_base: "http://localhost:9200".to_string(),
            cloudinary_api_base: "http://localhost:9300".to_string(),
            upload_dir: std::env::temp_dir()
                .join("medibook-test-uploads")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

impl TestConfig {
    /// Point every external base URL at a wiremock server.
    pub fn with_data_api(mut self, url: &str) -> Self {
        self.data_api_url = url.to_string();
        self
    }

    pub fn with_stripe(mut self, url: &str) -> Self {
        self.stripe_api_base = url.to_string();
        self
    }

    pub fn with_cloudinary(mut self, url: &str) -> Self {
        self.cloudinary_api_base = url.to_string();
        self
    }

    pub fn with_upload_dir(mut self, dir: &str) -> Self {
        self.upload_dir = dir.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            data_api_url: self.data_api_url.clone(),
            data_api_key: "test-data-api-key".to_string(),
            data_source: "Cluster0".to_string(),
            database_name: "medibook_test".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            admin_email: "admin@medibook.test".to_string(),
            admin_password: "admin-password-123".to_string(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_webhook_secret: "whsec_test_secret".to_string(),
            stripe_api_base: self.stripe_api_base.clone(),
            checkout_success_url: "http://localhost:5173/verify?success=true".to_string(),
            checkout_cancel_url: "http://localhost:5173/verify?success=false".to_string(),
            currency: "usd".to_string(),
            cloudinary_api_base: self.cloudinary_api_base.clone(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_api_key: "test-cloudinary-key".to_string(),
            cloudinary_api_secret: "test-cloudinary-secret".to_string(),
            upload_dir: self.upload_dir.clone(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(chrono::Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, ttl_hours: Option<i64>) -> String {
        mint_token(
            &user.id,
            &user.role,
            Some(&user.email),
            secret,
            ttl_hours.unwrap_or(24),
        )
        .expect("test token")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockDataApiResponses;

impl MockDataApiResponses {
    pub fn user_document(user_id: &str, email: &str, name: &str) -> serde_json::Value {
        json!({
            "_id": user_id,
            "name": name,
            "email": email,
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$hashhashhashhash",
            "image": "https://cdn.example.com/default-avatar.png",
            "phone": "0000000000",
            "address": { "line1": "", "line2": "" },
            "gender": "Not Selected",
            "dob": "Not Selected",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_document(doctor_id: &str, email: &str, name: &str) -> serde_json::Value {
        json!({
            "_id": doctor_id,
            "name": name,
            "email": email,
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$hashhashhashhash",
            "image": "https://cdn.example.com/doctor.png",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Committed to accessible primary care.",
            "fees": 5000,
            "available": true,
            "address": { "line1": "17th Cross, Richmond", "line2": "Circle, Ring Road, London" },
            "slots_booked": {},
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_document(
        appointment_id: &str,
        user_id: &str,
        doctor_id: &str,
    ) -> serde_json::Value {
        json!({
            "_id": appointment_id,
            "user_id": user_id,
            "doctor_id": doctor_id,
            "slot_date": "25_12_2025",
            "slot_time": "10:00 AM",
            "user_snapshot": Self::user_document(user_id, "patient@example.com", "Test Patient"),
            "doctor_snapshot": Self::doctor_document(doctor_id, "doctor@example.com", "Dr. Test"),
            "amount": 5000,
            "payment": false,
            "cancelled": false,
            "is_completed": false,
            "booked_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn find_one(document: serde_json::Value) -> serde_json::Value {
        json!({ "document": document })
    }

    pub fn find_one_empty() -> serde_json::Value {
        json!({ "document": null })
    }

    pub fn find(documents: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "documents": documents })
    }

    pub fn inserted(id: &str) -> serde_json::Value {
        json!({ "insertedId": id })
    }

    pub fn updated(matched: u64) -> serde_json::Value {
        json!({ "matchedCount": matched, "modifiedCount": matched })
    }
}
