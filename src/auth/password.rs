/// Password Hashing and Verification (bcrypt, per-hash random salt)

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash a password using bcrypt
///
/// # Errors
/// - Validation error when the password is outside the allowed length
/// - Internal error when bcrypt fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password_strength(password)?;

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }

    // bcrypt only reads the first 72 bytes; the cap also bounds hashing cost
    if length > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "pw123456";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("pw123456").unwrap();
        let second = hash_password("pw123456").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("pw123456").expect("Failed to hash password");

        assert!(verify_password("pw123456", &hash).expect("Failed to verify password"));
        assert!(!verify_password("pw1234567", &hash).expect("Failed to verify password"));
    }

    #[test]
    fn test_verify_against_garbage_hash_errors() {
        assert!(verify_password("pw123456", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_too_short_password() {
        assert!(matches!(
            hash_password("short1"),
            Err(AppError::Validation(ValidationError::TooShort(_, 8)))
        ));
    }

    #[test]
    fn test_too_long_password() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(hash_password(&long_password).is_err());
    }
}
