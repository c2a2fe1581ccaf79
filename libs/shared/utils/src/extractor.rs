use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Bearer-token middleware. Decodes the token and stashes the caller in
/// request extensions for the handlers behind it.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let user = validate_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Role gate used inside handlers behind `auth_middleware`.
pub fn require_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role.as_deref() == Some(role) {
        Ok(())
    } else {
        Err(AppError::Auth(format!("Requires {} role", role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            id: "u-1".to_string(),
            email: None,
            role: Some(role.to_string()),
            created_at: Some(Utc::now()),
        }
    }

    #[test]
    fn role_gate_accepts_matching_role() {
        assert!(require_role(&user("admin"), "admin").is_ok());
    }

    #[test]
    fn role_gate_rejects_other_roles() {
        assert!(require_role(&user("patient"), "admin").is_err());
    }
}
