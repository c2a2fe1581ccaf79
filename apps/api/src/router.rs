use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use payment_cell::router::payment_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medibook API is running!" }))
        .nest("/api/user", patient_routes(state.clone()))
        .nest("/api/doctor", doctor_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .merge(payment_routes(state))
}
