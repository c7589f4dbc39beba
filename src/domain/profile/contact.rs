//! Email address and verification code value objects.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Length of the numeric code sent to the user's inbox.
pub const VERIFICATION_CODE_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A syntactically valid, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !EMAIL_PATTERN.is_match(value) {
            return Err(ValidationError::invalid_format(
                "email",
                "expected an address like name@example.com",
            ));
        }
        Ok(Self(value.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A six digit one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::empty_field("verification_code"));
        }
        if value.len() != VERIFICATION_CODE_LEN || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "verification_code",
                format!("expected exactly {} digits", VERIFICATION_CODE_LEN),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn email_without_domain_is_rejected() {
        assert!(EmailAddress::parse("ada@").is_err());
        assert!(EmailAddress::parse("ada.example.com").is_err());
        assert!(EmailAddress::parse("ada@example").is_err());
    }

    #[test]
    fn blank_email_is_an_empty_field() {
        assert_eq!(
            EmailAddress::parse(" ").unwrap_err(),
            ValidationError::empty_field("email")
        );
    }

    #[test]
    fn six_digit_code_is_accepted() {
        assert_eq!(VerificationCode::parse("012345").unwrap().as_str(), "012345");
    }

    #[test]
    fn code_with_wrong_length_or_letters_is_rejected() {
        assert!(VerificationCode::parse("12345").is_err());
        assert!(VerificationCode::parse("1234567").is_err());
        assert!(VerificationCode::parse("12a456").is_err());
        assert!(VerificationCode::parse("１２３４５６").is_err());
    }
}
