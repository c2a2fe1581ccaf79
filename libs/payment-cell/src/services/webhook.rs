use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::APPOINTMENTS_COLLECTION;

use crate::models::{PaymentError, WebhookEvent};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_TOLERANCE_SECONDS: i64 = 300;
const COMPLETED_EVENT: &str = "checkout.session.completed";

/// Verifies and applies payment gateway webhooks. The signature must be
/// checked against the raw body before any of the payload is trusted.
pub struct WebhookService {
    db: DataApiClient,
    webhook_secret: String,
}

impl WebhookService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
            webhook_secret: config.stripe_webhook_secret.clone(),
        }
    }

    /// Checks a `t=...,v1=...` signature header: the timestamp must be within
    /// tolerance and the HMAC-SHA256 of `"{t}.{body}"` must match `v1`.
    pub fn verify_signature(&self, header: &str, payload: &[u8]) -> Result<(), PaymentError> {
        let mut timestamp = None;
        let mut signature = None;

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value.to_string()),
                Some(("v1", value)) => signature = Some(value.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(PaymentError::InvalidSignature)?;
        let signature = signature.ok_or(PaymentError::InvalidSignature)?;

        let sent_at: i64 = timestamp
            .parse()
            .map_err(|_| PaymentError::InvalidSignature)?;
        if (Utc::now().timestamp() - sent_at).abs() > SIGNATURE_TOLERANCE_SECONDS {
            return Err(PaymentError::InvalidSignature);
        }

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|_| PaymentError::InvalidSignature)?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        let expected = decode_hex(&signature)?;
        mac.verify_slice(&expected)
            .map_err(|_| PaymentError::InvalidSignature)
    }

    /// Applies a verified event. Only a completed, paid checkout session
    /// touches the database; everything else is logged and acknowledged.
    pub async fn process_event(&self, payload: &[u8]) -> Result<(), PaymentError> {
        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::Validation(format!("Invalid webhook payload: {}", e)))?;

        if event.event_type != COMPLETED_EVENT {
            info!("Ignoring webhook event type {}", event.event_type);
            return Ok(());
        }

        if event.data.object.payment_status.as_deref() != Some("paid") {
            warn!("Completed checkout session arrived without paid status");
            return Ok(());
        }

        let appointment_id = event
            .data
            .object
            .metadata
            .get("appointment_id")
            .ok_or_else(|| {
                PaymentError::Validation("Missing appointment_id metadata".to_string())
            })?;

        let matched = self
            .db
            .update_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id }),
                json!({ "$set": { "payment": true } }),
            )
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        if matched == 0 {
            warn!("Paid webhook referenced unknown appointment {}", appointment_id);
            return Ok(());
        }

        info!("Marked appointment {} as paid", appointment_id);
        Ok(())
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, PaymentError> {
    if s.len() % 2 != 0 {
        return Err(PaymentError::InvalidSignature);
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| PaymentError::InvalidSignature))
        .collect()
}
