use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::records::Address;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile fields accepted from the multipart update form. The image part is
/// handled separately through the media cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub gender: Option<String>,
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor is not available")]
    DoctorUnavailable,

    #[error("Slot is already booked")]
    SlotTaken,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Not authorized for this appointment")]
    NotOwner,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::EmailTaken => AppError::Conflict(err.to_string()),
            PatientError::InvalidCredentials => AppError::Auth(err.to_string()),
            PatientError::UserNotFound
            | PatientError::DoctorNotFound
            | PatientError::AppointmentNotFound => AppError::NotFound(err.to_string()),
            PatientError::DoctorUnavailable | PatientError::AlreadyCancelled => {
                AppError::BadRequest(err.to_string())
            }
            PatientError::SlotTaken => AppError::Conflict(err.to_string()),
            PatientError::NotOwner => AppError::Auth(err.to_string()),
            PatientError::Validation(msg) => AppError::Validation(msg),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), PatientError> {
    let pattern = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| PatientError::Validation(e.to_string()))?;
    if pattern.is_match(email) {
        Ok(())
    } else {
        Err(PatientError::Validation("Enter a valid email".to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<(), PatientError> {
    if password.len() < 8 {
        return Err(PatientError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}
