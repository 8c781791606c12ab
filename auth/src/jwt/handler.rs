use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// Registered claims applied when issuing a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOptions {
    pub subject: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime from now; `None` issues a token without `exp`.
    pub expires_in: Option<Duration>,
}

impl IssueOptions {
    pub fn new(subject: impl ToString, issuer: impl ToString, audience: impl ToString) -> Self {
        Self {
            subject: subject.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            expires_in: None,
        }
    }

    pub fn expires_in(mut self, lifetime: Duration) -> Self {
        self.expires_in = Some(lifetime);
        self
    }
}

/// Optional issuer/audience constraints checked on verification.
///
/// An absent constraint accepts any value for that claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyConstraints {
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl VerifyConstraints {
    /// No constraints: any correctly signed, unexpired token passes.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(issuer: impl ToString, audience: impl ToString) -> Self {
        Self {
            issuer: Some(issuer.to_string()),
            audience: Some(audience.to_string()),
        }
    }
}

/// JWT token handler for issuing and verifying tokens.
///
/// Uses HS256 (HMAC with SHA-256). Keys are derived once from the secret and
/// never change afterwards, so a handler can be shared freely across requests.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign a payload together with the registered claims from `options`.
    ///
    /// # Arguments
    /// * `payload` - Custom fields, must serialize to a JSON object
    /// * `options` - Subject, issuer, audience and optional lifetime
    ///
    /// # Returns
    /// Compact JWT string
    ///
    /// # Errors
    /// * `InvalidPayload` - Payload is not a JSON object
    /// * `ReservedClaim` - Payload shadows a registered claim
    /// * `EncodingFailed` - Signing failed
    pub fn issue<P: Serialize>(
        &self,
        payload: &P,
        options: &IssueOptions,
    ) -> Result<String, JwtError> {
        let mut claims = Claims::from_payload(payload)?
            .with_subject(&options.subject)
            .with_issuer(&options.issuer)
            .with_audience(&options.audience);

        if let Some(lifetime) = options.expires_in {
            claims = claims.expiring_in(lifetime);
        }

        self.encode(&claims)
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    /// * `constraints` - Issuer/audience the token must carry
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed JWT
    /// * `InvalidSignature` - Signature does not match
    /// * `TokenExpired` - `exp` claim is in the past
    /// * `IssuerMismatch` / `AudienceMismatch` - Constraint not satisfied
    /// * `MissingClaim` - Constrained claim absent from the token
    pub fn verify(&self, token: &str, constraints: &VerifyConstraints) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // exp is optional: session tokens never expire
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        match &constraints.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }

        match &constraints.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Predicate form of [`JwtHandler::verify`] without constraints.
    pub fn try_verify(&self, token: &str) -> bool {
        self.verify(token, &VerifyConstraints::any()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct ResetPayload {
        id: i64,
    }

    fn login_options() -> IssueOptions {
        IssueOptions::new("7", "login", "users")
    }

    #[test]
    fn test_issue_and_verify() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .issue(&json!({ "id": 7, "name": "Ana" }), &login_options())
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = handler
            .verify(&token, &VerifyConstraints::new("login", "users"))
            .expect("Failed to verify token");
        assert_eq!(claims.sub, Some("7".to_string()));
        assert_eq!(claims.iss, Some("login".to_string()));
        assert_eq!(claims.aud, Some("users".to_string()));
        assert_eq!(claims.exp, None);
        assert_eq!(claims.extra.get("name"), Some(&json!("Ana")));
    }

    #[test]
    fn test_issue_is_deterministic_without_expiry() {
        let handler = JwtHandler::new(SECRET);
        let payload = json!({ "id": 7 });

        let first = handler.issue(&payload, &login_options()).unwrap();
        let second = handler.issue(&payload, &login_options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_issue_with_expiry_sets_exp() {
        let handler = JwtHandler::new(SECRET);
        let options = IssueOptions::new("7", "forget", "users").expires_in(Duration::minutes(30));

        let token = handler.issue(&ResetPayload { id: 7 }, &options).unwrap();
        let claims = handler.verify(&token, &VerifyConstraints::any()).unwrap();

        assert!(claims.exp.is_some());
        assert_eq!(claims.payload::<ResetPayload>().unwrap(), ResetPayload { id: 7 });
    }

    #[test]
    fn test_issuer_mismatch_rejected() {
        let handler = JwtHandler::new(SECRET);
        let reset_options =
            IssueOptions::new("7", "forget", "users").expires_in(Duration::minutes(30));

        let reset_token = handler.issue(&ResetPayload { id: 7 }, &reset_options).unwrap();
        let login_token = handler.issue(&json!({ "id": 7 }), &login_options()).unwrap();

        assert_eq!(
            handler.verify(&reset_token, &VerifyConstraints::new("login", "users")),
            Err(JwtError::IssuerMismatch)
        );
        assert_eq!(
            handler.verify(&login_token, &VerifyConstraints::new("forget", "users")),
            Err(JwtError::IssuerMismatch)
        );
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let handler = JwtHandler::new(SECRET);
        let token = handler
            .issue(&json!({ "id": 7 }), &IssueOptions::new("7", "login", "admins"))
            .unwrap();

        let result = handler.verify(&token, &VerifyConstraints::new("login", "users"));
        assert_eq!(result, Err(JwtError::AudienceMismatch));
    }

    #[test]
    fn test_unconstrained_verify_accepts_any_namespace() {
        let handler = JwtHandler::new(SECRET);
        let token = handler
            .issue(&json!({ "id": 7 }), &IssueOptions::new("7", "forget", "users"))
            .unwrap();

        assert!(handler.verify(&token, &VerifyConstraints::any()).is_ok());
        assert!(handler.try_verify(&token));
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = JwtHandler::new(SECRET);
        let options = IssueOptions::new("7", "forget", "users").expires_in(Duration::minutes(-5));

        let token = handler.issue(&ResetPayload { id: 7 }, &options).unwrap();

        assert_eq!(
            handler.verify(&token, &VerifyConstraints::new("forget", "users")),
            Err(JwtError::TokenExpired)
        );
        assert!(!handler.try_verify(&token));
    }

    #[test]
    fn test_verify_malformed_token() {
        let handler = JwtHandler::new(SECRET);

        let result = handler.verify("invalid.token.here", &VerifyConstraints::any());
        assert!(matches!(result, Err(JwtError::Malformed(_))));
        assert!(!handler.try_verify("not-a-jwt"));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = handler1.issue(&json!({ "id": 7 }), &login_options()).unwrap();

        let result = handler2.verify(&token, &VerifyConstraints::any());
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_issue_rejects_reserved_payload_field() {
        let handler = JwtHandler::new(SECRET);

        let result = handler.issue(&json!({ "id": 7, "aud": "admins" }), &login_options());
        assert_eq!(result, Err(JwtError::ReservedClaim("aud".to_string())));
    }
}
