use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::IssueOptions;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::VerifyConstraints;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Built once at startup from the signing secret and shared read-only afterwards.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage, with a freshly generated salt.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `payload` - Custom token fields
    /// * `options` - Registered claims for the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate<P: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        payload: &P,
        options: &IssueOptions,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(payload, options)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token<P: Serialize>(
        &self,
        payload: &P,
        options: &IssueOptions,
    ) -> Result<String, JwtError> {
        self.jwt_handler.issue(payload, options)
    }

    /// Verify a token under the given issuer/audience constraints.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn verify_token(
        &self,
        token: &str,
        constraints: &VerifyConstraints,
    ) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token, constraints)
    }

    /// Whether the token is any correctly signed, unexpired token.
    pub fn is_token_valid(&self, token: &str) -> bool {
        self.jwt_handler.try_verify(token)
    }
}
