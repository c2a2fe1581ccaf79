use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_models::records::{Address, Appointment};

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorLoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields a doctor may edit on their own listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorProfileUpdate {
    pub fees: Option<i64>,
    pub address: Option<Address>,
    pub about: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDashboard {
    /// Sum of amounts over paid or completed appointments, minor units.
    pub earnings: i64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Appointment belongs to another doctor")]
    NotOwner,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Cannot complete a cancelled appointment")]
    CompletingCancelled,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::InvalidCredentials | DoctorError::NotOwner => AppError::Auth(err.to_string()),
            DoctorError::DoctorNotFound | DoctorError::AppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            DoctorError::AlreadyCancelled | DoctorError::CompletingCancelled => {
                AppError::BadRequest(err.to_string())
            }
            DoctorError::Validation(msg) => AppError::Validation(msg),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}
