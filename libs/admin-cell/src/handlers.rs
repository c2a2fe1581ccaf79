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
use shared_utils::extractor::require_role;

use crate::models::{AddDoctorRequest, AdminLoginRequest};
use crate::services::onboarding::OnboardingService;
use crate::services::oversight::OversightService;

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let onboarding_service = OnboardingService::new(&state);
    let token = onboarding_service.login(&request.email, &request.password)?;

    Ok(Json(json!({
        "success": true,
        "token": token
    })))
}

/// Multipart doctor onboarding. Text parts carry the profile fields; the
/// required `image` part flows through the upload pipeline first so the stored
/// document only ever holds a CDN URL.
#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "admin")?;

    let mut request = AddDoctorRequest::default();
    let mut image_url = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "name" => request.name = read_text(field).await?,
            "email" => request.email = read_text(field).await?,
            "password" => request.password = read_text(field).await?,
            "speciality" => request.speciality = read_text(field).await?,
            "degree" => request.degree = read_text(field).await?,
            "experience" => request.experience = read_text(field).await?,
            "about" => request.about = read_text(field).await?,
            "fees" => {
                let raw = read_text(field).await?;
                request.fees = raw
                    .parse()
                    .map_err(|_| AppError::Validation("Invalid fees value".to_string()))?;
            }
            "address" => {
                let raw = read_text(field).await?;
                let address: Address = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Validation(format!("Invalid address: {}", e)))?;
                request.address = Some(address);
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

    let image_url =
        image_url.ok_or_else(|| AppError::Validation("Doctor image is required".to_string()))?;

    let onboarding_service = OnboardingService::new(&state);
    let doctor = onboarding_service.add_doctor(request, image_url).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor.sanitized(),
        "message": "Doctor added"
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "admin")?;

    let oversight_service = OversightService::new(&state);
    let doctors = oversight_service.list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn toggle_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "admin")?;

    let oversight_service = OversightService::new(&state);
    let available = oversight_service.toggle_availability(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "available": available
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "admin")?;

    let oversight_service = OversightService::new(&state);
    let appointments = oversight_service.list_appointments().await?;

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
    require_role(&user, "admin")?;

    let oversight_service = OversightService::new(&state);
    oversight_service.cancel_appointment(appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "admin")?;

    let oversight_service = OversightService::new(&state);
    let dashboard = oversight_service.dashboard().await?;

    Ok(Json(json!({
        "success": true,
        "dashboard": dashboard
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
