use auth::IssueOptions;
use auth::VerifyConstraints;
use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

pub const SESSION_ISSUER: &str = "login";
pub const PASSWORD_RESET_ISSUER: &str = "forget";
pub const TOKEN_AUDIENCE: &str = "users";

/// Issuer namespaces scoping a token to exactly one flow.
///
/// Tokens from one namespace never verify under the other, so a reset token
/// cannot act as a session and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenNamespace {
    Session,
    PasswordReset,
}

impl TokenNamespace {
    pub fn issuer(&self) -> &'static str {
        match self {
            TokenNamespace::Session => SESSION_ISSUER,
            TokenNamespace::PasswordReset => PASSWORD_RESET_ISSUER,
        }
    }

    pub fn audience(&self) -> &'static str {
        TOKEN_AUDIENCE
    }

    /// Registered claims for a token about `subject` in this namespace.
    pub fn issue_options(&self, subject: UserId) -> IssueOptions {
        IssueOptions::new(subject, self.issuer(), self.audience())
    }

    pub fn constraints(&self) -> VerifyConstraints {
        VerifyConstraints::new(self.issuer(), self.audience())
    }
}

/// Payload carried by session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for SessionClaims {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Payload carried by password reset tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordResetClaims {
    pub id: UserId,
}

/// Signed session token handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Outcome of a password reset request; never carries the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordResetRequested {
    pub success: bool,
}

/// Outbound mail request, passed to the dispatcher unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub subject: String,
    pub recipient: String,
    pub template: String,
    pub context: serde_json::Value,
}

/// Mail settings for the password reset flow.
#[derive(Debug, Clone)]
pub struct ResetMailSettings {
    pub subject: String,
    pub template: String,
    /// Deliver every reset mail here instead of the principal's address.
    pub recipient_override: Option<EmailAddress>,
}

impl Default for ResetMailSettings {
    fn default() -> Self {
        Self {
            subject: "Password recovery".to_string(),
            template: "forget".to_string(),
            recipient_override: None,
        }
    }
}

/// Tunables of the auth flows, fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub reset_token_ttl: Duration,
    pub reset_mail: ResetMailSettings,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            reset_token_ttl: Duration::minutes(30),
            reset_mail: ResetMailSettings::default(),
        }
    }
}
