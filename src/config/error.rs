//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Collection name must be a single path segment")]
    InvalidCollection,

    #[error("min_photos must be at least 1 and not exceed max_photos")]
    InvalidPhotoBounds,

    #[error("max_photo_bytes must be greater than zero")]
    InvalidPhotoSize,

    #[error("minimum_age must be between 13 and 100")]
    InvalidMinimumAge,

    #[error("Verification codes are {expected} digits, got {actual}")]
    UnsupportedCodeLength { expected: usize, actual: usize },
}
