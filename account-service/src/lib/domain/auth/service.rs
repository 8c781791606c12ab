use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::VerifyConstraints;
use serde_json::json;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::ResetTokenError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::AuthSettings;
use crate::domain::auth::models::MailMessage;
use crate::domain::auth::models::PasswordResetClaims;
use crate::domain::auth::models::PasswordResetRequested;
use crate::domain::auth::models::SessionClaims;
use crate::domain::auth::models::TokenNamespace;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::MailDispatcher;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service orchestrating login, registration and password reset.
pub struct AuthService<US, UR, MD>
where
    US: UserServicePort,
    UR: UserRepository,
    MD: MailDispatcher,
{
    user_service: Arc<US>,
    repository: Arc<UR>,
    mail_dispatcher: Arc<MD>,
    authenticator: Arc<Authenticator>,
    settings: AuthSettings,
    /// Verified against when the email is unknown, so both login failures cost one Argon2 run.
    decoy_hash: Option<String>,
}

impl<US, UR, MD> AuthService<US, UR, MD>
where
    US: UserServicePort,
    UR: UserRepository,
    MD: MailDispatcher,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_service` - Registration collaborator
    /// * `repository` - Principal lookup and password updates
    /// * `mail_dispatcher` - Outbound mail for reset tokens
    /// * `authenticator` - Hasher and token codec built from the signing secret
    /// * `settings` - Reset token lifetime and mail settings
    pub fn new(
        user_service: Arc<US>,
        repository: Arc<UR>,
        mail_dispatcher: Arc<MD>,
        authenticator: Arc<Authenticator>,
        settings: AuthSettings,
    ) -> Self {
        let decoy_hash = authenticator
            .hash_password("decoy-password-for-unknown-principals")
            .map_err(|e| tracing::error!(error = %e, "Failed to build decoy password hash"))
            .ok();

        Self {
            user_service,
            repository,
            mail_dispatcher,
            authenticator,
            settings,
            decoy_hash,
        }
    }

    fn verify_reset_token(&self, reset_token: &str) -> Result<UserId, ResetTokenError> {
        let claims = self
            .authenticator
            .verify_token(reset_token, &TokenNamespace::PasswordReset.constraints())?;

        let id = claims
            .extra
            .get("id")
            .ok_or_else(|| UserIdError::InvalidFormat("missing id claim".to_string()))?;

        Ok(UserId::from_claim(id)?)
    }

    fn reset_recipient<'a>(&'a self, user: &'a User) -> &'a str {
        self.settings
            .reset_mail
            .recipient_override
            .as_ref()
            .unwrap_or(&user.email)
            .as_str()
    }
}

#[async_trait]
impl<US, UR, MD> AuthServicePort for AuthService<US, UR, MD>
where
    US: UserServicePort,
    UR: UserRepository,
    MD: MailDispatcher,
{
    fn issue_session_token(&self, user: &User) -> Result<AccessToken, AuthError> {
        let access_token = self
            .authenticator
            .issue_token(
                &SessionClaims::from(user),
                &TokenNamespace::Session.issue_options(user.id),
            )
            .map_err(AuthError::TokenIssuance)?;

        Ok(AccessToken { access_token })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            if let Some(decoy_hash) = &self.decoy_hash {
                let _ = self.authenticator.verify_password(password, decoy_hash);
            }
            tracing::info!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                password,
                &user.password_hash,
                &SessionClaims::from(&user),
                &TokenNamespace::Session.issue_options(user.id),
            )
            .map_err(|e| {
                tracing::info!(error = %e, "Login rejected");
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(AccessToken {
            access_token: result.access_token,
        })
    }

    async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<PasswordResetRequested, AuthError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::info!("Password reset requested for unknown email, nothing sent");
            return Ok(PasswordResetRequested { success: true });
        };

        let options = TokenNamespace::PasswordReset
            .issue_options(user.id)
            .expires_in(self.settings.reset_token_ttl);
        let token = self
            .authenticator
            .issue_token(&PasswordResetClaims { id: user.id }, &options)
            .map_err(AuthError::TokenIssuance)?;

        let message = MailMessage {
            subject: self.settings.reset_mail.subject.clone(),
            recipient: self.reset_recipient(&user).to_string(),
            template: self.settings.reset_mail.template.clone(),
            context: json!({
                "name": user.name.as_str(),
                "token": token,
            }),
        };

        self.mail_dispatcher.send(&message).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to dispatch reset mail");
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "Password reset mail dispatched");

        Ok(PasswordResetRequested { success: true })
    }

    async fn reset_password(
        &self,
        new_password: Password,
        reset_token: &str,
    ) -> Result<AccessToken, AuthError> {
        let user_id = self.verify_reset_token(reset_token).map_err(|cause| {
            tracing::warn!(error = %cause, "Password reset token rejected");
            AuthError::from(cause)
        })?;

        let password_hash = self.authenticator.hash_password(new_password.expose())?;

        let user = self
            .repository
            .update_password(&user_id, &password_hash)
            .await
            .map_err(|e| match e {
                UserError::NotFound(_) => {
                    tracing::warn!(user_id = %user_id, "Password reset token names unknown user");
                    AuthError::from(ResetTokenError::UnknownUser(user_id))
                }
                other => {
                    tracing::error!(user_id = %user_id, error = %other, "Password update failed");
                    AuthError::User(other)
                }
            })?;

        tracing::info!(user_id = %user.id, "Password reset completed");

        self.issue_session_token(&user)
    }

    async fn register(&self, command: CreateUserCommand) -> Result<AccessToken, AuthError> {
        let user = self.user_service.create_user(command).await?;
        self.issue_session_token(&user)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.authenticator
            .verify_token(token, &VerifyConstraints::any())
            .map_err(AuthError::InvalidToken)
    }

    fn is_token_valid(&self, token: &str) -> bool {
        self.authenticator.is_token_valid(token)
    }

    fn decode_session(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.authenticator
            .verify_token(token, &TokenNamespace::Session.constraints())
            .and_then(|claims| claims.payload::<SessionClaims>())
            .map_err(AuthError::InvalidToken)
    }
}
