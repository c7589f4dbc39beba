//! Height value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

pub const MIN_HEIGHT_INCHES: u16 = 48;
pub const MAX_HEIGHT_INCHES: u16 = 96;

/// Height in whole inches, picked from a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Height(u16);

impl Height {
    /// Validates the picker state: exactly one value must be selected.
    pub fn from_selection(selected: &[u16]) -> Result<Self, ValidationError> {
        match selected {
            [] => Err(ValidationError::nothing_selected("height")),
            [inches] => Self::from_inches(*inches),
            many => Err(ValidationError::invalid_format(
                "height",
                format!("exactly one height must be selected, got {}", many.len()),
            )),
        }
    }

    pub fn from_inches(inches: u16) -> Result<Self, ValidationError> {
        if !(MIN_HEIGHT_INCHES..=MAX_HEIGHT_INCHES).contains(&inches) {
            return Err(ValidationError::out_of_range(
                "height",
                MIN_HEIGHT_INCHES as i32,
                MAX_HEIGHT_INCHES as i32,
                inches as i32,
            ));
        }
        Ok(Self(inches))
    }

    pub fn inches(&self) -> u16 {
        self.0
    }

    /// Every selectable height, shortest first.
    pub fn options() -> impl Iterator<Item = Height> {
        (MIN_HEIGHT_INCHES..=MAX_HEIGHT_INCHES).map(Height)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}' {}\"", self.0 / 12, self.0 % 12)
    }
}
