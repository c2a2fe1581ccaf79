use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::CreateCheckoutRequest;
use crate::services::checkout::CheckoutService;
use crate::services::webhook::WebhookService;

#[axum::debug_handler]
pub async fn create_checkout_session(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<Value>, AppError> {
    let checkout_service = CheckoutService::new(&state);
    let session = checkout_service
        .create_session(&user.id, request.appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "session_id": session.id,
        "session_url": session.url
    })))
}

/// Raw-body webhook endpoint. The signature covers the exact bytes on the
/// wire, so the body must not pass through a JSON extractor first.
#[axum::debug_handler]
pub async fn webhook(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".to_string()))?;

    let webhook_service = WebhookService::new(&state);
    webhook_service.verify_signature(signature, &body)?;
    webhook_service.process_event(&body).await?;

    Ok(Json(json!({ "success": true, "received": true })))
}
