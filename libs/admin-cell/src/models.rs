use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::records::{Address, Appointment};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Doctor onboarding payload, assembled from the multipart fields of
/// `POST /doctors`. The image part is handled separately.
#[derive(Debug, Clone, Default)]
pub struct AddDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: i64,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub patients: usize,
    pub appointments: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("A doctor with this email already exists")]
    EmailTaken,
    #[error("Doctor not found")]
    DoctorNotFound,
    #[error("Appointment not found")]
    AppointmentNotFound,
    #[error("Appointment already cancelled")]
    AlreadyCancelled,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(String),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidCredentials => AppError::Auth(err.to_string()),
            AdminError::EmailTaken => AppError::Conflict(err.to_string()),
            AdminError::DoctorNotFound | AdminError::AppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            AdminError::AlreadyCancelled => AppError::BadRequest(err.to_string()),
            AdminError::Validation(msg) => AppError::Validation(msg),
            AdminError::Database(msg) => AppError::Database(msg),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), AdminError> {
    let pattern = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| AdminError::Validation(e.to_string()))?;
    if pattern.is_match(email) {
        Ok(())
    } else {
        Err(AdminError::Validation("Enter a valid email".to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<(), AdminError> {
    if password.len() < 8 {
        return Err(AdminError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn email_validation() {
        assert!(validate_email("admin@example.com").is_ok());
        assert_matches!(validate_email("not-an-email"), Err(AdminError::Validation(_)));
        assert_matches!(validate_email("two words@x.com"), Err(AdminError::Validation(_)));
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("long enough").is_ok());
        assert_matches!(validate_password("short"), Err(AdminError::Validation(_)));
    }

    #[test]
    fn errors_map_to_app_errors() {
        assert_matches!(AppError::from(AdminError::EmailTaken), AppError::Conflict(_));
        assert_matches!(
            AppError::from(AdminError::InvalidCredentials),
            AppError::Auth(_)
        );
        assert_matches!(
            AppError::from(AdminError::AlreadyCancelled),
            AppError::BadRequest(_)
        );
    }
}
