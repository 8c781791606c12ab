use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way credential hasher (Argon2id, PHC string output).
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh random salt from the OS RNG.
    pub fn generate_salt(&self) -> SaltString {
        SaltString::generate(&mut OsRng)
    }

    /// Hash a plaintext password with an explicit salt.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash_with_salt(&self, password: &str, salt: &SaltString) -> Result<String, PasswordError> {
        Argon2::default()
            .hash_password(password.as_bytes(), salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Hash a plaintext password with a salt generated for this call only.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = self.generate_salt();
        self.hash_with_salt(password, &salt)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "secret123";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_uses_fresh_salt_per_call() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first).unwrap());
        assert!(hasher.verify("secret123", &second).unwrap());
    }

    #[test]
    fn test_hash_with_same_salt_is_stable() {
        let hasher = PasswordHasher::new();
        let salt = hasher.generate_salt();

        let first = hasher.hash_with_salt("secret123", &salt).unwrap();
        let second = hasher.hash_with_salt("secret123", &salt).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }
}
