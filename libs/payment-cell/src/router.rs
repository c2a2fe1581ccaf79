use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Payment routes sit at the application root rather than under a role
/// prefix: the checkout endpoint is authenticated, the webhook is not.
pub fn payment_routes(state: Arc<AppConfig>) -> Router {
    let checkout_routes = Router::new()
        .route(
            "/api/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let webhook_routes = Router::new().route("/webhook", post(handlers::webhook));

    Router::new()
        .merge(checkout_routes)
        .merge(webhook_routes)
        .with_state(state)
}
