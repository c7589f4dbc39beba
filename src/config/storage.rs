//! Photo storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::profile::PhotoRules;

/// Photo storage location and photo-set limits
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory blobs are written under
    #[serde(default = "default_photo_dir")]
    pub photo_dir: PathBuf,

    #[serde(default = "default_min_photos")]
    pub min_photos: usize,

    #[serde(default = "default_max_photos")]
    pub max_photos: usize,

    /// Upper bound on a single photo, in bytes
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
}

impl StorageConfig {
    /// Limits enforced by the photo screen
    pub fn photo_rules(&self) -> PhotoRules {
        PhotoRules {
            min_photos: self.min_photos,
            max_photos: self.max_photos,
            max_photo_bytes: self.max_photo_bytes,
        }
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.photo_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.photo_dir"));
        }
        if self.min_photos == 0 || self.min_photos > self.max_photos {
            return Err(ValidationError::InvalidPhotoBounds);
        }
        if self.max_photo_bytes == 0 {
            return Err(ValidationError::InvalidPhotoSize);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_dir: default_photo_dir(),
            min_photos: default_min_photos(),
            max_photos: default_max_photos(),
            max_photo_bytes: default_max_photo_bytes(),
        }
    }
}

fn default_photo_dir() -> PathBuf {
    PathBuf::from("./data/photos")
}

fn default_min_photos() -> usize {
    PhotoRules::default().min_photos
}

fn default_max_photos() -> usize {
    PhotoRules::default().max_photos
}

fn default_max_photo_bytes() -> usize {
    PhotoRules::default().max_photo_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_photo_rules() {
        let config = StorageConfig::default();
        assert_eq!(config.photo_rules(), PhotoRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let config = StorageConfig {
            min_photos: 4,
            max_photos: 3,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPhotoBounds));
    }

    #[test]
    fn test_zero_min_is_rejected() {
        let config = StorageConfig {
            min_photos: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPhotoBounds));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let config = StorageConfig {
            max_photo_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPhotoSize));
    }
}
