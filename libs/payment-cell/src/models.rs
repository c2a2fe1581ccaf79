use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    pub appointment_id: Uuid,
}

/// The slice of a checkout session response we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Incoming webhook event. Only `checkout.session.completed` is acted on;
/// everything else is acknowledged untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub object: CheckoutObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutObject {
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Appointment not found")]
    AppointmentNotFound,
    #[error("Appointment does not belong to this user")]
    NotOwner,
    #[error("Appointment is cancelled")]
    Cancelled,
    #[error("Appointment is already paid")]
    AlreadyPaid,
    #[error("Invalid webhook signature")]
    InvalidSignature,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AppointmentNotFound => AppError::NotFound(err.to_string()),
            PaymentError::NotOwner => AppError::Auth(err.to_string()),
            PaymentError::Cancelled | PaymentError::AlreadyPaid => {
                AppError::BadRequest(err.to_string())
            }
            PaymentError::InvalidSignature => AppError::BadRequest(err.to_string()),
            PaymentError::Validation(msg) => AppError::Validation(msg),
            PaymentError::Database(msg) => AppError::Database(msg),
            PaymentError::Gateway(msg) => AppError::ExternalService(msg),
        }
    }
}
