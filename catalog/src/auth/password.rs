use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use std::sync::OnceLock;

use super::error::AuthError;

const MIN_LENGTH: usize = 8;

/// Hash a credential with Argon2 and a fresh salt
pub fn hash_credential(credential: &str) -> Result<String, AuthError> {
    validate_credential_strength(credential)?;

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(credential.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHashError(e.to_string()))
}

/// Check a presented credential against a stored PHC hash string
pub fn verify_credential(credential: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AuthError::PasswordHashError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(credential.as_bytes(), &parsed)
        .is_ok())
}

/// Run one verification against a fixed hash and discard the result.
///
/// Used when the subject is unknown so that the response takes as long as a
/// wrong-credential response for a known subject.
pub fn burn_verification(credential: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY.get_or_init(|| hash_credential("unknown-subject-0").ok());
    if let Some(hash) = dummy {
        let _ = verify_credential(credential, hash);
    }
}

pub fn validate_credential_strength(credential: &str) -> Result<(), AuthError> {
    if credential.chars().count() < MIN_LENGTH {
        return Err(AuthError::WeakPassword);
    }

    let has_letter = credential.chars().any(|c| c.is_alphabetic());
    let has_digit = credential.chars().any(|c| c.is_numeric());

    if !has_letter || !has_digit {
        return Err(AuthError::WeakPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_credential("password123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_credential("password123", &hash).unwrap());
        assert!(!verify_credential("password124", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let first = hash_credential("password123").unwrap();
        let second = hash_credential("password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_unparseable_hash_is_an_error() {
        assert!(matches!(
            verify_credential("password123", "plaintext"),
            Err(AuthError::PasswordHashError(_))
        ));
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_credential_strength("abcdefg1").is_ok());
        assert!(validate_credential_strength("abc1").is_err());
        assert!(validate_credential_strength("abcdefghij").is_err());
        assert!(validate_credential_strength("1234567890").is_err());
    }
}
