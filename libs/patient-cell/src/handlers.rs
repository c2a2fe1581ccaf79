use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use media_cell::models::MediaError;
use media_cell::services::upload::ImageUploadService;
use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::records::Address;

use crate::models::{BookAppointmentRequest, LoginRequest, ProfileUpdate, RegisterRequest};
use crate::services::account::AccountService;
use crate::services::booking::BookingService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let account_service = AccountService::new(&state);
    let token = account_service.register(request).await?;

    Ok(Json(json!({
        "success": true,
        "token": token
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let account_service = AccountService::new(&state);
    let token = account_service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "token": token
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let account_service = AccountService::new(&state);
    let profile = account_service.get_profile(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "user": profile
    })))
}

/// Multipart profile update. Text parts carry the fields; an optional `image`
/// part flows through the upload pipeline and lands as a CDN URL.
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut update = ProfileUpdate::default();
    let mut image_url = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "name" => update.name = Some(read_text(field).await?),
            "phone" => update.phone = Some(read_text(field).await?),
            "gender" => update.gender = Some(read_text(field).await?),
            "dob" => update.dob = Some(read_text(field).await?),
            "address" => {
                let raw = read_text(field).await?;
                let address: Address = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Validation(format!("Invalid address: {}", e)))?;
                update.address = Some(address);
            }
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image part: {}", e)))?;

                let upload_service = ImageUploadService::new(&state);
                let uploaded = upload_service
                    .store_image(&data, &content_type)
                    .await
                    .map_err(map_media_error)?;
                image_url = Some(uploaded.url);
            }
            _ => {}
        }
    }

    let account_service = AccountService::new(&state);
    account_service
        .update_profile(&user.id, update, image_url)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated"
    })))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let appointment = booking_service.book_appointment(&user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked"
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let appointments = booking_service.list_appointments(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    booking_service
        .cancel_appointment(&user.id, appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled"
    })))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}

fn map_media_error(err: MediaError) -> AppError {
    match err {
        MediaError::UnsupportedType(_) | MediaError::TooLarge { .. } | MediaError::Empty => {
            AppError::Validation(err.to_string())
        }
        MediaError::Storage(msg) => AppError::Internal(msg),
        MediaError::ImageHost(msg) => AppError::ExternalService(msg),
    }
}
