//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the account service:
//! - Password hashing (Argon2id, salt regenerated per hash)
//! - Signed claims tokens (HS256 JWT) with issuer/audience namespaces
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{IssueOptions, JwtHandler, VerifyConstraints};
//! use serde_json::json;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let options = IssueOptions::new("42", "login", "users");
//! let token = handler.issue(&json!({ "id": 42 }), &options).unwrap();
//!
//! let claims = handler
//!     .verify(&token, &VerifyConstraints::new("login", "users"))
//!     .unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("42"));
//!
//! // A token from one issuer namespace is rejected by another.
//! assert!(handler
//!     .verify(&token, &VerifyConstraints::new("forget", "users"))
//!     .is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssueOptions;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::VerifyConstraints;
pub use password::PasswordError;
pub use password::PasswordHasher;
