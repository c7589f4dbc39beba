//! PersonName value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

const MAX_NAME_LEN: usize = 50;

/// A validated first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    /// Validates raw text field input. Surrounding whitespace is trimmed.
    pub fn new(first: &str, last: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            first: validate_part("first_name", first)?,
            last: validate_part("last_name", last)?,
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

fn validate_part(field: &str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_NAME_LEN as i32,
            len as i32,
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(ValidationError::invalid_format(
            field,
            "only letters, spaces, apostrophes and hyphens are allowed",
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_names() {
        let name = PersonName::new("  Ada ", "Lovelace").unwrap();
        assert_eq!(name.first(), "Ada");
        assert_eq!(name.last(), "Lovelace");
    }

    #[test]
    fn accepts_hyphens_apostrophes_and_non_ascii_letters() {
        assert!(PersonName::new("Zoë", "O'Neil-Øster").is_ok());
    }

    #[test]
    fn rejects_blank_first_name() {
        let err = PersonName::new("   ", "Lovelace").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("first_name"));
    }

    #[test]
    fn rejects_empty_last_name() {
        let err = PersonName::new("Ada", "").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("last_name"));
    }

    #[test]
    fn rejects_digits() {
        let err = PersonName::new("Ada2", "Lovelace").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "a".repeat(51);
        let err = PersonName::new(&long, "Lovelace").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { actual: 51, .. }));
    }
}
