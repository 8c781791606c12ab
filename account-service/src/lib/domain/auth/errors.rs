use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

/// Error for mail dispatch operations
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Failed to serialize mail request: {0}")]
    SerializationFailed(String),

    #[error("Failed to deliver mail request: {0}")]
    DeliveryFailed(String),
}

/// Why a password reset token was refused.
///
/// Kept for logs; callers only ever see the opaque `InvalidResetToken`.
#[derive(Debug, Clone, Error)]
pub enum ResetTokenError {
    #[error("token rejected: {0}")]
    Rejected(#[from] JwtError),

    #[error("token does not carry a valid user id: {0}")]
    MalformedSubject(#[from] UserIdError),

    #[error("token refers to unknown user {0}")]
    UnknownUser(UserId),
}

/// Top-level error for authentication flows
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password share this variant and message.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(JwtError),

    #[error("invalid reset token")]
    InvalidResetToken(#[source] ResetTokenError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Mail dispatch failed: {0}")]
    MailDelivery(#[from] MailError),
}

impl From<ResetTokenError> for AuthError {
    fn from(err: ResetTokenError) -> Self {
        AuthError::InvalidResetToken(err)
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => AuthError::Password(e),
            auth::AuthenticationError::JwtError(e) => AuthError::TokenIssuance(e),
        }
    }
}
