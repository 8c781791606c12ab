use std::collections::BTreeMap;

use chrono::Duration;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Registered claim names that custom payload fields may not shadow.
pub const REGISTERED_CLAIMS: [&str; 7] = ["sub", "exp", "iat", "nbf", "iss", "aud", "jti"];

/// Generic JWT claims structure.
///
/// Standard RFC 7519 claims plus the custom payload, which is flattened into
/// the token body next to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (principal identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Custom payload fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build claims from an arbitrary serializable payload.
    ///
    /// # Errors
    /// * `InvalidPayload` - Payload does not serialize to a JSON object
    /// * `ReservedClaim` - Payload contains a registered claim name
    pub fn from_payload<P: Serialize>(payload: &P) -> Result<Self, JwtError> {
        let value =
            serde_json::to_value(payload).map_err(|e| JwtError::InvalidPayload(e.to_string()))?;

        let fields = match value {
            serde_json::Value::Object(fields) => fields,
            other => return Err(JwtError::InvalidPayload(other.to_string())),
        };

        if let Some(reserved) = fields
            .keys()
            .find(|key| REGISTERED_CLAIMS.contains(&key.as_str()))
        {
            return Err(JwtError::ReservedClaim(reserved.clone()));
        }

        Ok(Self {
            extra: fields.into_iter().collect(),
            ..Self::default()
        })
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration relative to now.
    pub fn expiring_in(self, lifetime: Duration) -> Self {
        let exp = (Utc::now() + lifetime).timestamp();
        self.with_expiration(exp)
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl ToString) -> Self {
        self.aud = Some(aud.to_string());
        self
    }

    /// Deserialize the custom payload fields into a typed structure.
    ///
    /// # Errors
    /// * `InvalidPayload` - Fields do not match the requested shape
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, JwtError> {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| JwtError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Profile {
        id: i64,
        name: String,
    }

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("42");
        assert_eq!(claims.sub, Some("42".to_string()));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_from_payload_flattens_fields() {
        let claims = Claims::from_payload(&Profile {
            id: 7,
            name: "Ana".to_string(),
        })
        .unwrap();

        assert_eq!(claims.extra.get("id"), Some(&json!(7)));
        assert_eq!(claims.extra.get("name"), Some(&json!("Ana")));
        assert!(claims.sub.is_none());
    }

    #[test]
    fn test_from_payload_rejects_non_object() {
        let result = Claims::from_payload(&"just a string");
        assert!(matches!(result, Err(JwtError::InvalidPayload(_))));
    }

    #[test]
    fn test_from_payload_rejects_registered_claim() {
        let result = Claims::from_payload(&json!({ "id": 1, "iss": "login" }));
        assert_eq!(result, Err(JwtError::ReservedClaim("iss".to_string())));
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_expiration(1234567890)
            .with_issuer("forget")
            .with_audience("users");

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iss, Some("forget".to_string()));
        assert_eq!(claims.aud, Some("users".to_string()));
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_payload_round_trips_typed_fields() {
        let claims = Claims::from_payload(&json!({ "id": 7, "name": "Ana" }))
            .unwrap()
            .with_subject("7");

        let profile: Profile = claims.payload().unwrap();
        assert_eq!(
            profile,
            Profile {
                id: 7,
                name: "Ana".to_string()
            }
        );
    }

    #[test]
    fn test_payload_shape_mismatch() {
        let claims = Claims::from_payload(&json!({ "id": "seven" })).unwrap();
        let result = claims.payload::<Profile>();
        assert!(matches!(result, Err(JwtError::InvalidPayload(_))));
    }

    #[test]
    fn test_expiring_in_sets_future_exp() {
        let now = Utc::now().timestamp();
        let claims = Claims::new().expiring_in(Duration::minutes(30));

        let exp = claims.exp.unwrap();
        assert!(exp >= now + 30 * 60);
        assert!(exp <= Utc::now().timestamp() + 30 * 60);
    }
}
