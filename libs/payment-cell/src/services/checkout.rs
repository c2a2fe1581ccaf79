use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{Appointment, APPOINTMENTS_COLLECTION};

use crate::models::{CheckoutSession, PaymentError};

/// Creates hosted checkout sessions for unpaid appointments.
pub struct CheckoutService {
    db: DataApiClient,
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
    currency: String,
    success_url: String,
    cancel_url: String,
}

impl CheckoutService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
            client: reqwest::Client::new(),
            api_base: config.stripe_api_base.clone(),
            secret_key: config.stripe_secret_key.clone(),
            currency: config.currency.clone(),
            success_url: config.checkout_success_url.clone(),
            cancel_url: config.checkout_cancel_url.clone(),
        }
    }

    pub async fn create_session(
        &self,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<CheckoutSession, PaymentError> {
        let appointment: Appointment = self
            .db
            .find_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
            )
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::AppointmentNotFound)?;

        if appointment.user_id.to_string() != user_id {
            return Err(PaymentError::NotOwner);
        }
        if appointment.cancelled {
            return Err(PaymentError::Cancelled);
        }
        if appointment.payment {
            return Err(PaymentError::AlreadyPaid);
        }

        let doctor_name = appointment
            .doctor_snapshot
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("Doctor")
            .to_string();

        let amount = appointment.amount.to_string();
        let appointment_ref = appointment_id.to_string();
        let product_name = format!("Appointment with {}", doctor_name);

        let params = [
            ("mode", "payment"),
            ("success_url", &self.success_url),
            ("cancel_url", &self.cancel_url),
            ("line_items[0][price_data][currency]", &self.currency),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][price_data][product_data][name]", &product_name),
            ("line_items[0][quantity]", "1"),
            ("metadata[appointment_id]", &appointment_ref),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway(format!(
                "Checkout session creation failed ({}): {}",
                status, body
            )));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        info!(
            "Created checkout session {} for appointment {}",
            session.id, appointment_id
        );
        Ok(session)
    }
}
