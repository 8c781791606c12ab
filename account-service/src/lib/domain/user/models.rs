use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// The principal behind every session: identity, credential hash and role.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: Name,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type (store-assigned, strictly positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Build a user ID from a raw integer.
    ///
    /// # Errors
    /// * `NotPositive` - Value is zero or negative
    pub fn new(value: i64) -> Result<Self, UserIdError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(UserIdError::NotPositive(value))
        }
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not an integer
    /// * `NotPositive` - Integer is zero or negative
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| UserIdError::InvalidFormat(s.to_string()))?;
        Self::new(value)
    }

    /// Read a user ID from a token claim.
    ///
    /// Accepts an integer JSON number or a numeric string.
    ///
    /// # Errors
    /// * `InvalidFormat` - Claim is neither an integer nor a numeric string
    /// * `NotPositive` - Integer is zero or negative
    pub fn from_claim(value: &serde_json::Value) -> Result<Self, UserIdError> {
        match value {
            serde_json::Value::Number(number) => number
                .as_i64()
                .ok_or_else(|| UserIdError::InvalidFormat(number.to_string()))
                .and_then(Self::new),
            serde_json::Value::String(s) => Self::from_string(s),
            other => Err(UserIdError::InvalidFormat(other.to_string())),
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, 1 to 63 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    const MAX_LENGTH: usize = 63;

    /// Create a new valid name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name longer than 63 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration and reset.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Closed set of roles; compared by equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: Name,
    pub email: EmailAddress,
    pub password: Password,
}

impl CreateUserCommand {
    /// # Arguments
    /// * `name` - Validated display name
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(name: Name, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// User data handed to the store for insertion; the store assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: Name,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_id_rejects_non_positive() {
        assert_eq!(UserId::new(1), Ok(UserId(1)));
        assert_eq!(UserId::new(0), Err(UserIdError::NotPositive(0)));
        assert_eq!(UserId::new(-4), Err(UserIdError::NotPositive(-4)));
    }

    #[test]
    fn test_user_id_from_claim() {
        assert_eq!(UserId::from_claim(&json!(12)), Ok(UserId(12)));
        assert_eq!(UserId::from_claim(&json!("12")), Ok(UserId(12)));
        assert!(matches!(
            UserId::from_claim(&json!("twelve")),
            Err(UserIdError::InvalidFormat(_))
        ));
        assert!(matches!(
            UserId::from_claim(&json!(1.5)),
            Err(UserIdError::InvalidFormat(_))
        ));
        assert!(matches!(
            UserId::from_claim(&json!(null)),
            Err(UserIdError::InvalidFormat(_))
        ));
        assert_eq!(
            UserId::from_claim(&json!(-3)),
            Err(UserIdError::NotPositive(-3))
        );
    }

    #[test]
    fn test_name_is_trimmed_and_bounded() {
        assert_eq!(Name::new("  Ana ".to_string()).unwrap().as_str(), "Ana");
        assert_eq!(Name::new("   ".to_string()), Err(NameError::Empty));
        assert!(matches!(
            Name::new("a".repeat(64)),
            Err(NameError::TooLong { max: 63, actual: 64 })
        ));
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("ana@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret".to_string()).is_ok());
        assert_eq!(
            Password::new("abc".to_string()),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 3 })
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("secret123".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("secret123"));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
    }
}
