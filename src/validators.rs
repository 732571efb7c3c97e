/// Input validators for request bodies.
///
/// Every validator returns the normalized value on success so handlers
/// never store untrimmed input.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_LOCAL_PART_LENGTH: usize = 64;
pub const MAX_NAME_LENGTH: usize = 255; // VARCHAR(255) columns
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
pub const MAX_ICON_LENGTH: usize = 10;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Unwraps an optional request field, reporting which field was missing.
pub fn require<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField(field.to_string()))
}

/// Validates an email address and returns it trimmed and lower-cased.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    let local_part_too_long = trimmed
        .split('@')
        .next()
        .map(|local| local.len() > MAX_LOCAL_PART_LENGTH)
        .unwrap_or(true);
    if local_part_too_long {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_lowercase())
}

/// Validates a board or task name: non-empty after trimming, bounded, printable.
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.to_string(), MAX_NAME_LENGTH));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat(field.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates free-text descriptions. Empty is allowed; NUL bytes are not
/// (Postgres text columns reject them).
pub fn is_valid_description(description: &str) -> Result<String, ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong(
            "description".to_string(),
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    if description.contains('\0') {
        return Err(ValidationError::InvalidFormat("description".to_string()));
    }

    Ok(description.to_string())
}

/// Validates a task icon: a short glyph of at most ten characters.
pub fn is_valid_icon(icon: &str) -> Result<String, ValidationError> {
    let trimmed = icon.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("icon".to_string()));
    }

    if trimmed.chars().count() > MAX_ICON_LENGTH {
        return Err(ValidationError::TooLong("icon".to_string(), MAX_ICON_LENGTH));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("a@b.com").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(
            is_valid_email("  User@Example.COM ").unwrap(),
            "user@example.com"
        );
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
        assert!(is_valid_email("").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());

        let long_local = format!("{}@example.com", "a".repeat(65));
        assert_eq!(
            is_valid_email(&long_local),
            Err(ValidationError::InvalidFormat("email".to_string()))
        );

        assert!(is_valid_email("a@b").is_err());
    }

    #[test]
    fn test_require_reports_field() {
        assert_eq!(require("name", Some(3)), Ok(3));
        assert_eq!(
            require::<String>("name", None),
            Err(ValidationError::MissingField("name".to_string()))
        );
    }

    #[test]
    fn test_valid_name() {
        assert_eq!(is_valid_name("name", "  Groceries ").unwrap(), "Groceries");
        assert!(is_valid_name("name", "Task Won't Do").is_ok());
        assert!(is_valid_name("name", "Fix -- the; bug").is_ok());
    }

    #[test]
    fn test_name_limits() {
        assert!(is_valid_name("name", "").is_err());
        assert!(is_valid_name("name", "   ").is_err());
        assert!(is_valid_name("name", &"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(is_valid_name("name", &"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(is_valid_name("name", "tab\there").is_err());
    }

    #[test]
    fn test_description() {
        assert_eq!(is_valid_description("").unwrap(), "");
        assert!(is_valid_description("multi\nline").is_ok());
        assert!(is_valid_description("nul\0byte").is_err());
        assert!(is_valid_description(&"d".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_icon_counts_characters_not_bytes() {
        assert_eq!(is_valid_icon("⏰").unwrap(), "⏰");
        assert!(is_valid_icon("✓").is_ok());
        assert!(is_valid_icon("🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉").is_ok());
        assert!(is_valid_icon("🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉").is_err());
        assert!(is_valid_icon("").is_err());
    }
}
