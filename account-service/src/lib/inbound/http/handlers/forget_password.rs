use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::PasswordResetRequested;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn forget_password(
    State(state): State<AppState>,
    Json(body): Json<ForgetPasswordRequest>,
) -> Result<ApiSuccess<PasswordResetRequested>, ApiError> {
    state
        .auth_service
        .request_password_reset(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|outcome| ApiSuccess::new(StatusCode::OK, outcome))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgetPasswordRequest {
    email: String,
}
