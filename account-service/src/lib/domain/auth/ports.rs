use async_trait::async_trait;
use auth::Claims;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::MailError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::MailMessage;
use crate::domain::auth::models::PasswordResetRequested;
use crate::domain::auth::models::SessionClaims;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;

/// Port for authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Issue a session token (`login` namespace) for a principal.
    ///
    /// # Errors
    /// * `TokenIssuance` - Signing failed
    fn issue_session_token(&self, user: &User) -> Result<AccessToken, AuthError>;

    /// Check credentials and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Password` - Stored hash is unusable
    /// * `User` - Store lookup failed
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError>;

    /// Mail a short-lived reset token to the principal owning `email`.
    ///
    /// Unknown addresses report success without sending anything.
    ///
    /// # Errors
    /// * `MailDelivery` - Dispatcher refused the mail
    /// * `User` - Store lookup failed
    async fn request_password_reset(&self, email: &str)
        -> Result<PasswordResetRequested, AuthError>;

    /// Replace the password of the principal named by a reset token.
    ///
    /// # Returns
    /// Fresh session token for the updated principal
    ///
    /// # Errors
    /// * `InvalidResetToken` - Token bad, expired, from another namespace, or names no user
    /// * `Password` - Hashing failed
    /// * `User` - Store update failed
    async fn reset_password(
        &self,
        new_password: Password,
        reset_token: &str,
    ) -> Result<AccessToken, AuthError>;

    /// Register a principal and issue its first session token.
    ///
    /// # Errors
    /// * `User` - Registration rejected or store failure
    async fn register(&self, command: CreateUserCommand) -> Result<AccessToken, AuthError>;

    /// Verify any token without namespace constraints and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Verification failed
    fn decode_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Predicate form of [`AuthServicePort::decode_token`].
    fn is_token_valid(&self, token: &str) -> bool;

    /// Verify a token as a session token and return its payload.
    ///
    /// # Errors
    /// * `InvalidToken` - Verification failed or payload malformed
    fn decode_session(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Outbound mail delivery.
#[async_trait]
pub trait MailDispatcher: Send + Sync + 'static {
    /// Hand a mail request to the delivery system.
    ///
    /// # Errors
    /// * `SerializationFailed` - Message could not be encoded
    /// * `DeliveryFailed` - Transport refused the message
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
