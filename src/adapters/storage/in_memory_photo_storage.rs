//! In-Memory Photo Storage Adapter
//!
//! Holds uploaded blobs in memory. An optional gate keeps uploads in flight
//! until the test releases them, which makes cancellation observable.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};

use crate::domain::profile::{PhotoAsset, PhotoKey, PhotoLocator};
use crate::ports::{PhotoStorage, StorageError};

/// In-memory blob storage that records starts, completions and cancellations
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhotoStorage {
    blobs: Arc<RwLock<HashMap<PhotoKey, Vec<u8>>>>,
    in_flight: Arc<RwLock<HashSet<PhotoKey>>>,
    cancelled: Arc<RwLock<Vec<PhotoKey>>>,
    gate: Option<Arc<Semaphore>>,
    force_error: Arc<RwLock<Option<StorageError>>>,
}

impl InMemoryPhotoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose uploads block until [`release`](Self::release) lets
    /// them through.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Lets `count` blocked uploads finish.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub async fn fail_with(&self, error: StorageError) {
        *self.force_error.write().await = Some(error);
    }

    pub async fn uploaded_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.read().await.len()
    }

    pub async fn cancelled(&self) -> Vec<PhotoKey> {
        self.cancelled.read().await.clone()
    }

    pub async fn contains(&self, key: &PhotoKey) -> bool {
        self.blobs.read().await.contains_key(key)
    }
}

#[async_trait]
impl PhotoStorage for InMemoryPhotoStorage {
    async fn upload(
        &self,
        key: &PhotoKey,
        asset: &PhotoAsset,
    ) -> Result<PhotoLocator, StorageError> {
        if let Some(error) = self.force_error.read().await.clone() {
            return Err(error);
        }
        self.in_flight.write().await.insert(key.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| StorageError::Cancelled(key.to_string()))?;
            permit.forget();
        }

        if !self.in_flight.write().await.remove(key) {
            return Err(StorageError::Cancelled(key.to_string()));
        }
        self.blobs
            .write()
            .await
            .insert(key.clone(), asset.bytes().to_vec());

        Ok(PhotoLocator::new(format!("memory://{}", key)))
    }

    async fn cancel(&self, key: &PhotoKey) -> Result<(), StorageError> {
        if self.in_flight.write().await.remove(key) {
            self.cancelled.write().await.push(key.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::time::Duration;

    fn asset() -> PhotoAsset {
        PhotoAsset::new("image/jpeg", vec![1, 2, 3])
    }

    fn key_for(asset: &PhotoAsset) -> PhotoKey {
        PhotoKey::for_asset(&UserId::new("u1").unwrap(), asset)
    }

    #[tokio::test]
    async fn ungated_upload_completes_immediately() {
        let storage = InMemoryPhotoStorage::new();
        let asset = asset();
        let key = key_for(&asset);

        let locator = storage.upload(&key, &asset).await.unwrap();

        assert_eq!(locator.as_str(), format!("memory://{}", key));
        assert!(storage.contains(&key).await);
        assert_eq!(storage.in_flight_count().await, 0);
    }

    #[tokio::test]
    async fn gated_upload_waits_for_release() {
        let storage = InMemoryPhotoStorage::gated();
        let asset = asset();
        let key = key_for(&asset);

        let task = {
            let storage = storage.clone();
            let key = key.clone();
            tokio::spawn(async move { storage.upload(&key, &asset).await })
        };
        while storage.in_flight_count().await == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(storage.uploaded_count().await, 0);

        storage.release(1);
        assert!(task.await.unwrap().is_ok());
        assert!(storage.contains(&key).await);
    }

    #[tokio::test]
    async fn cancel_discards_in_flight_upload() {
        let storage = InMemoryPhotoStorage::gated();
        let asset = asset();
        let key = key_for(&asset);

        let task = {
            let storage = storage.clone();
            let key = key.clone();
            tokio::spawn(async move { storage.upload(&key, &asset).await })
        };
        while storage.in_flight_count().await == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        storage.cancel(&key).await.unwrap();
        storage.release(1);

        assert!(matches!(
            task.await.unwrap(),
            Err(StorageError::Cancelled(_))
        ));
        assert_eq!(storage.cancelled().await, vec![key.clone()]);
        assert!(!storage.contains(&key).await);
    }

    #[tokio::test]
    async fn cancelling_unknown_key_is_not_recorded() {
        let storage = InMemoryPhotoStorage::new();
        storage.cancel(&key_for(&asset())).await.unwrap();
        assert!(storage.cancelled().await.is_empty());
    }
}
