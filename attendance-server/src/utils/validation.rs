//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Employee names (Chinese / English)
pub const MAX_NAME_LEN: usize = 200;

/// Usernames for login
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-blank and within the length limit.
///
/// `missing_message` is returned verbatim when the value is blank.
pub fn validate_required_text(
    value: &str,
    field: &str,
    missing_message: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(missing_message));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("Zhang San", "englishName", "English name is required", MAX_NAME_LEN).is_ok());

        let err = validate_required_text("   ", "englishName", "English name is required", MAX_NAME_LEN)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "English name is required"));

        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "englishName", "English name is required", MAX_NAME_LEN).is_err());
    }
}
