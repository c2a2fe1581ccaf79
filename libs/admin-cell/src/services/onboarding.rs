use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{Doctor, DOCTORS_COLLECTION};
use shared_utils::jwt::mint_token;
use shared_utils::password::hash_password;

use crate::models::{validate_email, validate_password, AddDoctorRequest, AdminError};

const TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Admin sign-in and doctor onboarding. The admin account itself lives in
/// configuration rather than the database.
pub struct OnboardingService {
    db: DataApiClient,
    jwt_secret: String,
    admin_email: String,
    admin_password: String,
}

impl OnboardingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<String, AdminError> {
        if email != self.admin_email || password != self.admin_password {
            return Err(AdminError::InvalidCredentials);
        }

        info!("Admin logged in");

        mint_token("admin", "admin", Some(email), &self.jwt_secret, TOKEN_TTL_HOURS)
            .map_err(AdminError::Validation)
    }

    pub async fn add_doctor(
        &self,
        request: AddDoctorRequest,
        image_url: String,
    ) -> Result<Doctor, AdminError> {
        if request.name.trim().is_empty() {
            return Err(AdminError::Validation("Name is required".to_string()));
        }
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        if request.speciality.trim().is_empty() {
            return Err(AdminError::Validation("Speciality is required".to_string()));
        }
        if request.fees < 0 {
            return Err(AdminError::Validation("Fees cannot be negative".to_string()));
        }

        let existing: Option<Doctor> = self
            .db
            .find_one(DOCTORS_COLLECTION, json!({ "email": request.email }))
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(AdminError::EmailTaken);
        }

        let password = hash_password(&request.password)
            .map_err(|e| AdminError::Database(e.to_string()))?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password,
            image: image_url,
            speciality: request.speciality,
            degree: request.degree,
            experience: request.experience,
            about: request.about,
            fees: request.fees,
            available: true,
            address: request.address.unwrap_or_default(),
            slots_booked: Default::default(),
            created_at: Utc::now(),
        };

        let document =
            serde_json::to_value(&doctor).map_err(|e| AdminError::Database(e.to_string()))?;
        self.db
            .insert_one(DOCTORS_COLLECTION, document)
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        info!("Onboarded doctor {} ({})", doctor.id, doctor.speciality);
        Ok(doctor)
    }
}
