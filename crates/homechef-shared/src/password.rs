//! Password digests.
//!
//! Digests are argon2id PHC strings (`$argon2id$v=19$...`) carrying their own
//! salt and parameters, so a stored value can be verified without any other
//! state.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::PasswordError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored digest.
///
/// A wrong password is `Ok(false)`; only an unparseable digest is an error.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::MalformedDigest)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("hunter22").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &digest).unwrap());
        assert!(!verify_password("hunter23", &digest).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_digest() {
        assert!(matches!(
            verify_password("x", "plaintext-not-a-digest"),
            Err(PasswordError::MalformedDigest)
        ));
    }
}
