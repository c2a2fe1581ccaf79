use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/list", get(handlers::list_doctors))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/appointments", get(handlers::list_appointments))
        .route(
            "/appointments/{appointment_id}/complete",
            post(handlers::complete_appointment),
        )
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .route("/availability", post(handlers::toggle_availability))
        .route("/dashboard", get(handlers::dashboard))
        .route("/profile", get(handlers::get_profile))
        .route("/profile", post(handlers::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
