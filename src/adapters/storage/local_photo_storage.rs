//! Local Photo Storage Adapter
//!
//! Writes blobs under a base directory, mirroring the object key layout.
//! Data lands in a `.part` file first and is renamed on success.
//!
//! The file work runs on the blocking pool, which keeps going even when the
//! calling task is aborted. Cancellation is therefore recorded per key and
//! checked under the same lock as the final rename: a cancelled upload
//! removes its own `.part` file, and `cancel` removes whatever already
//! reached the final path.

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::profile::{PhotoAsset, PhotoKey, PhotoLocator};
use crate::ports::{PhotoStorage, StorageError};

#[derive(Debug, Default)]
struct UploadRegistry {
    in_flight: HashSet<PhotoKey>,
    cancelled: HashSet<PhotoKey>,
}

#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    base_path: PathBuf,
    registry: Arc<Mutex<UploadRegistry>>,
}

impl LocalPhotoStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            registry: Arc::new(Mutex::new(UploadRegistry::default())),
        }
    }

    /// Final location of a blob
    pub fn blob_path(&self, key: &PhotoKey) -> PathBuf {
        self.base_path.join(key.as_str())
    }

    pub(crate) fn partial_path(&self, key: &PhotoKey) -> PathBuf {
        let mut path = self.blob_path(key).into_os_string();
        path.push(".part");
        PathBuf::from(path)
    }

    fn begin(&self, key: &PhotoKey) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .insert(key.clone());
    }
}

/// Writes the partial file, then either publishes it or discards it if the
/// key was cancelled meanwhile.
fn write_blob(
    registry: &Mutex<UploadRegistry>,
    key: &PhotoKey,
    partial: &Path,
    final_path: &Path,
    bytes: &[u8],
) -> Result<PathBuf, StorageError> {
    let written = final_path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(partial, bytes));

    let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.in_flight.remove(key);
    if registry.cancelled.remove(key) {
        drop(registry);
        remove_if_present(partial)?;
        return Err(StorageError::Cancelled(key.to_string()));
    }
    written.map_err(|e| StorageError::Io(e.to_string()))?;
    std::fs::rename(partial, final_path).map_err(|e| StorageError::Io(e.to_string()))?;
    drop(registry);

    std::fs::canonicalize(final_path).map_err(|e| StorageError::Io(e.to_string()))
}

fn remove_if_present(path: &Path) -> Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::Io(e.to_string())),
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn upload(
        &self,
        key: &PhotoKey,
        asset: &PhotoAsset,
    ) -> Result<PhotoLocator, StorageError> {
        self.begin(key);

        let registry = Arc::clone(&self.registry);
        let key = key.clone();
        let partial = self.partial_path(&key);
        let final_path = self.blob_path(&key);
        let bytes = asset.bytes().to_vec();

        let absolute = tokio::task::spawn_blocking(move || {
            write_blob(&registry, &key, &partial, &final_path, &bytes)
        })
        .await
        .map_err(|e| StorageError::Io(e.to_string()))??;

        Ok(PhotoLocator::new(format!("file://{}", absolute.display())))
    }

    async fn cancel(&self, key: &PhotoKey) -> Result<(), StorageError> {
        {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            if registry.in_flight.contains(key) {
                registry.cancelled.insert(key.clone());
            }
        }

        let partial = self.partial_path(key);
        let final_path = self.blob_path(key);
        tokio::task::spawn_blocking(move || {
            remove_if_present(&partial)?;
            remove_if_present(&final_path)
        })
        .await
        .map_err(|e| StorageError::Io(e.to_string()))?
    }
}
