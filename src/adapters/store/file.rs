//! File-based Document Store Adapter
//!
//! Stores one YAML document per user under `<data_dir>/<collection>/`.
//! Writes go to a temporary file that is renamed into place, so a crash
//! leaves either the previous or the new document, never a torn one.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{broadcast, Mutex};

use super::ProgressFeed;
use crate::domain::foundation::UserId;
use crate::domain::profile::{
    merge_document, ProfileField, ProfileUpdate, UserDocument, PROGRESS_KEY,
};
use crate::ports::{ProgressSubscriber, StoreError, UserDocumentStore};

/// File-based storage for user documents
#[derive(Debug)]
pub struct FileDocumentStore {
    collection_dir: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
    feed: ProgressFeed,
}

impl FileDocumentStore {
    /// Create a store rooted at `data_dir/collection`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDocumentStore::new("./data", "users");
    /// ```
    pub fn new<P: AsRef<Path>>(data_dir: P, collection: &str) -> Self {
        Self {
            collection_dir: data_dir.as_ref().join(collection),
            write_lock: Mutex::new(()),
            feed: ProgressFeed::new(),
        }
    }

    /// Path of the document for a user
    pub fn document_path(&self, user_id: &UserId) -> PathBuf {
        self.collection_dir
            .join(format!("{}.yaml", file_stem(user_id)))
    }

    async fn read(&self, user_id: &UserId) -> Result<Option<UserDocument>, StoreError> {
        let path = self.document_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let document = serde_yaml::from_str(&yaml)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Some(document))
    }

    async fn write(&self, user_id: &UserId, document: &UserDocument) -> Result<(), StoreError> {
        fs::create_dir_all(&self.collection_dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let yaml = serde_yaml::to_string(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = self.document_path(user_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    fn publish_progress(&self, user_id: &UserId, written: &UserDocument) {
        if let Some(Value::String(identifier)) = written.get(PROGRESS_KEY) {
            self.feed.publish(user_id, identifier);
        }
    }
}

/// Escapes anything outside `[A-Za-z0-9_-]` so an identifier cannot
/// name a path outside the collection.
fn file_stem(user_id: &UserId) -> String {
    let mut stem = String::with_capacity(user_id.as_str().len());
    for byte in user_id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[async_trait]
impl UserDocumentStore for FileDocumentStore {
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        initial: UserDocument,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.read(user_id).await?.is_some() {
            return Ok(false);
        }
        self.write(user_id, &initial).await?;
        self.publish_progress(user_id, &initial);
        Ok(true)
    }

    async fn update_user_fields(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self
            .read(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))?;
        if let Some(stored) = update.regresses_from(&document) {
            return Err(StoreError::ProgressRegressed {
                stored,
                attempted: update.progress().unwrap_or_default(),
            });
        }
        let patch = update.into_patch();
        merge_document(&mut document, patch.clone());
        self.write(user_id, &document).await?;
        self.publish_progress(user_id, &patch);
        Ok(())
    }

    async fn replace_field(
        &self,
        user_id: &UserId,
        field: ProfileField,
        value: Value,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self
            .read(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))?;
        document.insert(field.key().to_string(), value);
        self.write(user_id, &document).await
    }

    async fn load_document(&self, user_id: &UserId) -> Result<Option<UserDocument>, StoreError> {
        self.read(user_id).await
    }
}

impl ProgressSubscriber for FileDocumentStore {
    fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<String> {
        self.feed.subscribe(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signup::SignupProgress;
    use serde_json::json;
    use tempfile::TempDir;

    fn user() -> UserId {
        UserId::new("uid-42").unwrap()
    }

    fn initial() -> UserDocument {
        let mut doc = UserDocument::new();
        doc.insert(PROGRESS_KEY.into(), json!("initial"));
        doc
    }

    #[tokio::test]
    async fn test_earlier_progress_is_refused_and_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        let mut doc = initial();
        doc.insert(PROGRESS_KEY.into(), json!("heightComplete"));
        store.create_if_absent(&user(), doc).await.unwrap();

        let stale = ProfileUpdate::new()
            .set(ProfileField::FirstName, "Ada")
            .unwrap()
            .with_progress(SignupProgress::NameEntered);
        let result = store.update_user_fields(&user(), stale).await;

        assert_eq!(
            result,
            Err(StoreError::ProgressRegressed {
                stored: SignupProgress::HeightComplete,
                attempted: SignupProgress::NameEntered,
            })
        );
        let doc = store.load_document(&user()).await.unwrap().unwrap();
        assert_eq!(doc[PROGRESS_KEY], json!("heightComplete"));
        assert!(doc.get("firstName").is_none());
    }

    #[tokio::test]
    async fn test_missing_document_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        assert_eq!(store.load_document(&user()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_document_survives_a_new_store_instance() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileDocumentStore::new(temp_dir.path(), "users");
            store.create_if_absent(&user(), initial()).await.unwrap();
            let update = ProfileUpdate::new()
                .set(ProfileField::HeightInches, &70u16)
                .unwrap()
                .with_progress(SignupProgress::HeightComplete);
            store.update_user_fields(&user(), update).await.unwrap();
        }

        let reopened = FileDocumentStore::new(temp_dir.path(), "users");
        let doc = reopened.load_document(&user()).await.unwrap().unwrap();
        assert_eq!(doc["heightInches"], json!(70));
        assert_eq!(doc[PROGRESS_KEY], json!("heightComplete"));
    }

    #[tokio::test]
    async fn test_create_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        assert!(store.create_if_absent(&user(), initial()).await.unwrap());

        let mut other = UserDocument::new();
        other.insert(PROGRESS_KEY.into(), json!("complete"));
        assert!(!store.create_if_absent(&user(), other).await.unwrap());

        let doc = store.load_document(&user()).await.unwrap().unwrap();
        assert_eq!(doc[PROGRESS_KEY], json!("initial"));
    }

    #[tokio::test]
    async fn test_update_without_document_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        let result = store
            .replace_field(&user(), ProfileField::Photos, json!([]))
            .await;
        assert_eq!(result, Err(StoreError::NotFound(user())));
    }

    #[tokio::test]
    async fn test_corrupt_yaml_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        std::fs::create_dir_all(temp_dir.path().join("users")).unwrap();
        std::fs::write(store.document_path(&user()), "- just\n- a list\n").unwrap();

        assert!(matches!(
            store.load_document(&user()).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_user_id_cannot_escape_collection() {
        let store = FileDocumentStore::new("/data", "users");
        let path = store.document_path(&UserId::new("../etc/passwd").unwrap());
        assert_eq!(path, PathBuf::from("/data/users/%2E%2E%2Fetc%2Fpasswd.yaml"));
    }

    #[tokio::test]
    async fn test_progress_writes_are_broadcast() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path(), "users");
        let mut rx = store.subscribe(&user());

        store.create_if_absent(&user(), initial()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "initial");
    }
}
