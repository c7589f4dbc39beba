//! Location value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Where the user lives, as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locality: Option<String>,
}

impl Location {
    pub fn new(
        latitude: f64,
        longitude: f64,
        locality: Option<String>,
    ) -> Result<Self, ValidationError> {
        check_coordinate("latitude", latitude, 90.0)?;
        check_coordinate("longitude", longitude, 180.0)?;
        let locality = locality
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Ok(Self {
            latitude,
            longitude,
            locality,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }
}

fn check_coordinate(field: &str, value: f64, bound: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::invalid_format(field, "not a finite number"));
    }
    if value < -bound || value > bound {
        return Err(ValidationError::out_of_range(
            field,
            -(bound as i32),
            bound as i32,
            value as i32,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates_are_accepted() {
        let loc = Location::new(40.7128, -74.006, Some(" New York ".into())).unwrap();
        assert_eq!(loc.locality(), Some("New York"));
        assert_eq!(loc.latitude(), 40.7128);
    }

    #[test]
    fn blank_locality_is_dropped() {
        let loc = Location::new(0.0, 0.0, Some("  ".into())).unwrap();
        assert_eq!(loc.locality(), None);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(Location::new(91.0, 0.0, None).is_err());
        assert!(Location::new(0.0, -180.5, None).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(matches!(
            Location::new(f64::NAN, 0.0, None),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let loc = Location::new(1.5, 2.5, None).unwrap();
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 1.5, "longitude": 2.5}));
    }
}
