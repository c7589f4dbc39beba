//! PhotoStorage port - object storage for profile photos.

use async_trait::async_trait;

use crate::domain::profile::{PhotoAsset, PhotoKey, PhotoLocator};

/// Errors that can occur during photo storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Upload cancelled: {0}")]
    Cancelled(String),

    #[error("Photo storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Blob storage keyed per user and per asset
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Upload the asset under `key` and return its durable locator.
    async fn upload(&self, key: &PhotoKey, asset: &PhotoAsset)
        -> Result<PhotoLocator, StorageError>;

    /// Cancel an in-flight upload and discard anything partially written.
    ///
    /// Cancelling a key that is not uploading is not an error.
    async fn cancel(&self, key: &PhotoKey) -> Result<(), StorageError>;
}
