// ── Client-side form validation ──
//
// Everything here runs BEFORE a network call: a failed validation means
// the request is never issued and the error is attached to the offending
// field. The server re-validates everything; these checks exist to give
// instant feedback and to keep garbage requests off the wire.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // International or local formats, 7-15 digits with optional separators.
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-()]{5,18}[0-9]$").expect("phone regex"))
}

/// A required text field must be non-blank.
pub fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(())
}

/// Validate an email address (syntactic check only).
pub fn email(value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("email", "is required"));
    }
    if !email_re().is_match(trimmed) {
        return Err(CoreError::validation("email", "is not a valid email address"));
    }
    Ok(())
}

/// Validate a password for login (presence only -- no strength rules on
/// the way in, matching the backend's login contract).
pub fn password_present(value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::validation("password", "is required"));
    }
    Ok(())
}

/// Validate a new password for registration / reset: minimum 8 chars
/// with at least one letter and one digit.
pub fn new_password(value: &str) -> Result<(), CoreError> {
    if value.len() < 8 {
        return Err(CoreError::validation(
            "password",
            "must be at least 8 characters",
        ));
    }
    let has_letter = value.chars().any(char::is_alphabetic);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(CoreError::validation(
            "password",
            "must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

/// Passwords typed twice must match.
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password != confirmation {
        return Err(CoreError::validation(
            "confirmPassword",
            "passwords do not match",
        ));
    }
    Ok(())
}

/// Validate an optional phone number (empty is fine).
pub fn phone(value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if !phone_re().is_match(trimmed) {
        return Err(CoreError::validation(
            "phoneNumber",
            "is not a valid phone number",
        ));
    }
    Ok(())
}

/// A rejection reason must contain visible text -- whitespace-only input
/// is treated the same as empty (the reject endpoint is never called
/// with a blank reason).
pub fn rejection_reason(value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(
            "reason",
            "a rejection reason is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(email("shop@example.com").is_ok());
        assert!(email("  padded@example.co.za  ").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(email("not-an-email").is_err());
        assert!(email("missing@tld").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("").is_err());
    }

    #[test]
    fn login_password_presence_only() {
        assert!(password_present("x").is_ok());
        assert!(password_present("").is_err());
    }

    #[test]
    fn registration_password_rules() {
        assert!(new_password("abc123xy").is_ok());
        assert!(new_password("short1").is_err());
        assert!(new_password("onlyletters").is_err());
        assert!(new_password("12345678").is_err());
    }

    #[test]
    fn phone_is_optional_but_checked() {
        assert!(phone("").is_ok());
        assert!(phone("+27 82 555 0199").is_ok());
        assert!(phone("0825550199").is_ok());
        assert!(phone("letters").is_err());
    }

    #[test]
    fn blank_rejection_reason_is_refused() {
        assert!(rejection_reason("ID document unreadable").is_ok());
        assert!(rejection_reason("").is_err());
        assert!(rejection_reason("   \t  ").is_err());
    }
}
