use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{Doctor, DOCTORS_COLLECTION};

use crate::models::DoctorError;

/// Public doctor directory used by the booking front end.
pub struct DirectoryService {
    db: DataApiClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
        }
    }

    /// Every doctor on the platform, credentials elided.
    pub async fn list_public(&self) -> Result<Vec<Value>, DoctorError> {
        let doctors: Vec<Doctor> = self
            .db
            .find(
                DOCTORS_COLLECTION,
                json!({}),
                Some(json!({ "created_at": -1 })),
                None,
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        debug!("Listing {} doctors in public directory", doctors.len());
        Ok(doctors.iter().map(|d| d.public_view()).collect())
    }
}
