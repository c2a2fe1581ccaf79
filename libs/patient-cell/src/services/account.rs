use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{Address, User, USERS_COLLECTION};
use shared_utils::jwt::mint_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{
    validate_email, validate_password, LoginRequest, PatientError, ProfileUpdate, RegisterRequest,
};

const DEFAULT_AVATAR: &str = "https://res.cloudinary.com/demo/image/upload/default-avatar.png";
const TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Patient account management: registration, login, and profile upkeep.
pub struct AccountService {
    db: DataApiClient,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<String, PatientError> {
        if request.name.trim().is_empty() {
            return Err(PatientError::Validation("Name is required".to_string()));
        }
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let existing: Option<User> = self
            .db
            .find_one(USERS_COLLECTION, json!({ "email": request.email }))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(PatientError::EmailTaken);
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| PatientError::Database(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password: password_hash,
            image: DEFAULT_AVATAR.to_string(),
            phone: "0000000000".to_string(),
            address: Address::default(),
            gender: "Not Selected".to_string(),
            dob: "Not Selected".to_string(),
            created_at: Utc::now(),
        };

        let document =
            serde_json::to_value(&user).map_err(|e| PatientError::Database(e.to_string()))?;
        self.db
            .insert_one(USERS_COLLECTION, document)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        info!("Registered patient account {}", user.id);

        mint_token(
            &user.id.to_string(),
            "patient",
            Some(&user.email),
            &self.jwt_secret,
            TOKEN_TTL_HOURS,
        )
        .map_err(PatientError::Validation)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<String, PatientError> {
        let user: User = self
            .db
            .find_one(USERS_COLLECTION, json!({ "email": request.email }))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::InvalidCredentials)?;

        let valid = verify_password(&request.password, &user.password)
            .map_err(|e| PatientError::Database(e.to_string()))?;
        if !valid {
            return Err(PatientError::InvalidCredentials);
        }

        debug!("Patient {} logged in", user.id);

        mint_token(
            &user.id.to_string(),
            "patient",
            Some(&user.email),
            &self.jwt_secret,
            TOKEN_TTL_HOURS,
        )
        .map_err(PatientError::Validation)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Value, PatientError> {
        let user: User = self
            .db
            .find_one(USERS_COLLECTION, json!({ "_id": user_id }))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::UserNotFound)?;

        Ok(user.sanitized())
    }

    /// Applies the text fields and, when the upload middleware produced one,
    /// the new image URL, as a single update-by-id.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        image_url: Option<String>,
    ) -> Result<(), PatientError> {
        let mut fields = serde_json::Map::new();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(PatientError::Validation("Name cannot be empty".to_string()));
            }
            fields.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = update.phone {
            fields.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = update.address {
            fields.insert("address".to_string(), json!(address));
        }
        if let Some(gender) = update.gender {
            fields.insert("gender".to_string(), json!(gender));
        }
        if let Some(dob) = update.dob {
            fields.insert("dob".to_string(), json!(dob));
        }
        if let Some(url) = image_url {
            fields.insert("image".to_string(), json!(url));
        }

        if fields.is_empty() {
            return Err(PatientError::Validation("No fields to update".to_string()));
        }

        let matched = self
            .db
            .update_one(
                USERS_COLLECTION,
                json!({ "_id": user_id }),
                json!({ "$set": Value::Object(fields) }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if matched == 0 {
            return Err(PatientError::UserNotFound);
        }

        info!("Updated profile for patient {}", user_id);
        Ok(())
    }
}
