use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{DoctorLoginRequest, DoctorProfileUpdate};
use crate::services::directory::DirectoryService;
use crate::services::practice::PracticeService;

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let directory_service = DirectoryService::new(&state);
    let doctors = directory_service.list_public().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<DoctorLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let practice_service = PracticeService::new(&state);
    let token = practice_service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "token": token
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    let appointments = practice_service.list_appointments(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    practice_service
        .complete_appointment(&user.id, appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment completed"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    practice_service
        .cancel_appointment(&user.id, appointment_id)
        .await?;

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
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    let dashboard = practice_service.dashboard(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "dashboard": dashboard
    })))
}

#[axum::debug_handler]
pub async fn toggle_availability(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    let available = practice_service.set_availability(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "available": available
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    let profile = practice_service.get_profile(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": profile
    })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<DoctorProfileUpdate>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, "doctor")?;

    let practice_service = PracticeService::new(&state);
    practice_service.update_profile(&user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated"
    })))
}
