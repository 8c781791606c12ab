use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::access::RoleGuard;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware that validates session tokens and adds the principal to request extensions.
///
/// Only `login` namespace tokens are accepted; reset tokens are refused here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let session = state.auth_service.decode_session(token).map_err(|e| {
        tracing::warn!(error = %e, "Session token validation failed");
        unauthorized("Invalid or expired token")
    })?;

    // Role lives in the store, not in the token
    let user = state
        .user_service
        .get_user(&session.id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(user_id = %session.id, "Session token names unknown user");
                unauthorized("Invalid or expired token")
            }
            other => ApiError::from(other).into_response(),
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

/// Middleware enforcing the route's [`RoleGuard`].
///
/// Must be layered inside [`authenticate`].
pub async fn authorize(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(principal) = req.extensions().get::<AuthenticatedUser>() else {
        tracing::error!("Role guard reached without an authenticated principal");
        return Err(unauthorized("Authentication required"));
    };

    let role = principal.user.role;
    if !guard.allows(role) {
        tracing::warn!(
            user_id = %principal.user.id,
            role = %role,
            required = ?guard.required_roles(),
            "Access denied by role guard"
        );
        return Err(ApiError::Forbidden("Insufficient role".to_string()).into_response());
    }

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}
