//! Photo assets, storage keys and the photo-set rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AssetId, UserId, ValidationError};

/// Content types the photo screen accepts.
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/heic"];

/// An image picked on the photo screen, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    id: AssetId,
    content_type: String,
    bytes: Vec<u8>,
}

impl PhotoAsset {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: AssetId::new(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File extension derived from the content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/heic" => "heic",
            _ => "jpg",
        }
    }
}

/// Per-user, per-asset location of a blob in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoKey(String);

impl PhotoKey {
    pub fn for_asset(user_id: &UserId, asset: &PhotoAsset) -> Self {
        Self(format!(
            "users/{}/photos/{}.{}",
            user_id,
            asset.id(),
            asset.extension()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable retrieval locator returned by object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoLocator(String);

impl PhotoLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds on the photo set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRules {
    pub min_photos: usize,
    pub max_photos: usize,
    pub max_photo_bytes: usize,
}

impl Default for PhotoRules {
    fn default() -> Self {
        Self {
            min_photos: 1,
            max_photos: 6,
            max_photo_bytes: 10 * 1024 * 1024,
        }
    }
}

impl PhotoRules {
    /// Validates the picked assets before any upload starts.
    pub fn validate(&self, assets: &[PhotoAsset]) -> Result<(), ValidationError> {
        if assets.is_empty() {
            return Err(ValidationError::nothing_selected("photos"));
        }
        if assets.len() < self.min_photos || assets.len() > self.max_photos {
            return Err(ValidationError::out_of_range(
                "photos",
                self.min_photos as i32,
                self.max_photos as i32,
                assets.len() as i32,
            ));
        }
        for asset in assets {
            if asset.bytes().is_empty() {
                return Err(ValidationError::empty_field("photo"));
            }
            if asset.bytes().len() > self.max_photo_bytes {
                return Err(ValidationError::invalid_format(
                    "photo",
                    format!("larger than {} bytes", self.max_photo_bytes),
                ));
            }
            if !SUPPORTED_CONTENT_TYPES.contains(&asset.content_type()) {
                return Err(ValidationError::invalid_format(
                    "photo",
                    format!("unsupported content type '{}'", asset.content_type()),
                ));
            }
        }
        Ok(())
    }
}
