use auth::Claims;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Verify a token from any namespace and echo its claims.
pub async fn check_token(
    State(state): State<AppState>,
    Json(body): Json<CheckTokenRequest>,
) -> Result<ApiSuccess<Claims>, ApiError> {
    state
        .auth_service
        .decode_token(&body.token)
        .map_err(ApiError::from)
        .map(|claims| ApiSuccess::new(StatusCode::OK, claims))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckTokenRequest {
    token: String,
}
