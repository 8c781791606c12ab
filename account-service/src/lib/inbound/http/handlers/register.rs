use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Name;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AccessToken>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::CREATED, token))
}

/// HTTP request body for registering a principal (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseRegisterRequestError> {
        let name = Name::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(CreateUserCommand::new(name, email, password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request_parses() {
        let command = request("Ana", "ana@x.com", "secret1")
            .try_into_command()
            .unwrap();

        assert_eq!(command.name.as_str(), "Ana");
        assert_eq!(command.email.as_str(), "ana@x.com");
    }

    #[test]
    fn test_each_field_is_validated() {
        assert!(matches!(
            request("  ", "ana@x.com", "secret1").try_into_command(),
            Err(ParseRegisterRequestError::Name(_))
        ));
        assert!(matches!(
            request("Ana", "not-an-email", "secret1").try_into_command(),
            Err(ParseRegisterRequestError::Email(_))
        ));
        assert!(matches!(
            request("Ana", "ana@x.com", "123").try_into_command(),
            Err(ParseRegisterRequestError::Password(_))
        ));
    }
}
