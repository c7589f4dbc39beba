//! Onboarding rules configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::profile::VERIFICATION_CODE_LEN;

/// Rules applied by the onboarding screens
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// Minimum age in whole years on the date-of-birth screen
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,

    /// Length of email verification codes; only 6 is supported
    #[serde(default = "default_code_length")]
    pub verification_code_length: usize,
}

impl OnboardingConfig {
    /// Validate onboarding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(13..=100).contains(&self.minimum_age) {
            return Err(ValidationError::InvalidMinimumAge);
        }
        if self.verification_code_length != VERIFICATION_CODE_LEN {
            return Err(ValidationError::UnsupportedCodeLength {
                expected: VERIFICATION_CODE_LEN,
                actual: self.verification_code_length,
            });
        }
        Ok(())
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            minimum_age: default_minimum_age(),
            verification_code_length: default_code_length(),
        }
    }
}

fn default_minimum_age() -> u32 {
    18
}

fn default_code_length() -> usize {
    VERIFICATION_CODE_LEN
}
