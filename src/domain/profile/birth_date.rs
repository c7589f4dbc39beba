//! Date of birth entry and the minimum-age gate.
//!
//! The screen has three text fields (DD / MM / YYYY). Component range checks
//! run first for clearer messages, but the calendar check is authoritative:
//! 31/04 passes the range check and still fails.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Earliest accepted birth year.
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Raw text from the three date fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateOfBirthInput {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateOfBirthInput {
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
        }
    }
}

/// A calendar-valid birth date of someone at least the minimum age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// Validates the raw fields against `today`.
    pub fn parse(
        input: &DateOfBirthInput,
        today: NaiveDate,
        minimum_age: u32,
    ) -> Result<Self, ValidationError> {
        let day = parse_component("day", &input.day, 2)?;
        let month = parse_component("month", &input.month, 2)?;
        let year = parse_component("year", &input.year, 4)?;

        check_range("day", day, 1, 31)?;
        check_range("month", month, 1, 12)?;
        if input.year.trim().len() != 4 {
            return Err(ValidationError::invalid_format("year", "expected four digits"));
        }
        check_range("year", year, MIN_BIRTH_YEAR, today.year())?;

        let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
            ValidationError::invalid_format(
                "date_of_birth",
                format!("{:02}/{:02}/{} is not a calendar date", day, month, year),
            )
        })?;

        if date > today {
            return Err(ValidationError::invalid_format(
                "date_of_birth",
                "date is in the future",
            ));
        }

        let age = age_on(date, today);
        if age < minimum_age {
            return Err(ValidationError::Underage {
                minimum: minimum_age,
                actual: age,
            });
        }

        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Completed years of age on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        age_on(self.0, today)
    }
}

/// Completed years between `born` and `today`. A 29 February birthday is
/// reached on 1 March in non-leap years.
fn age_on(born: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

fn parse_component(field: &str, raw: &str, max_digits: usize) -> Result<i32, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if value.len() > max_digits || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            field,
            format!("expected up to {} digits", max_digits),
        ));
    }
    value
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "not a number"))
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(field, min, max, value));
    }
    Ok(())
}
