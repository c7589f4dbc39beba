//! In-Memory Document Store Adapter
//!
//! Keeps user documents in memory and records every write, so tests can
//! assert exactly which requests a screen issued. Useful for testing and
//! development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::ProgressFeed;
use crate::domain::foundation::UserId;
use crate::domain::profile::{
    merge_document, ProfileField, ProfileUpdate, UserDocument, PROGRESS_KEY,
};
use crate::ports::{ProgressSubscriber, StoreError, UserDocumentStore};

/// A write the store accepted, in the order it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    Create {
        user_id: UserId,
    },
    Update {
        user_id: UserId,
        patch: UserDocument,
    },
    Replace {
        user_id: UserId,
        field: ProfileField,
        value: Value,
    },
}

/// In-memory document store with failure injection
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<UserId, UserDocument>>>,
    writes: Arc<RwLock<Vec<RecordedWrite>>>,
    /// Optional error returned by every operation (for error testing)
    force_error: Arc<RwLock<Option<StoreError>>>,
    feed: ProgressFeed,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without recording a write.
    pub async fn insert_document(&self, user_id: &UserId, document: UserDocument) {
        self.documents
            .write()
            .await
            .insert(user_id.clone(), document);
    }

    /// Make every following operation fail with `error`.
    pub async fn fail_with(&self, error: StoreError) {
        *self.force_error.write().await = Some(error);
    }

    pub async fn clear_failure(&self) {
        *self.force_error.write().await = None;
    }

    /// Every accepted write so far.
    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        match self.force_error.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn record(&self, write: RecordedWrite) {
        self.writes.write().await.push(write);
    }

    fn publish_progress(&self, user_id: &UserId, document: &UserDocument) {
        if let Some(Value::String(identifier)) = document.get(PROGRESS_KEY) {
            self.feed.publish(user_id, identifier);
        }
    }
}

#[async_trait]
impl UserDocumentStore for InMemoryDocumentStore {
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        initial: UserDocument,
    ) -> Result<bool, StoreError> {
        self.check_failure().await?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(user_id) {
            return Ok(false);
        }
        self.publish_progress(user_id, &initial);
        documents.insert(user_id.clone(), initial);
        drop(documents);

        self.record(RecordedWrite::Create {
            user_id: user_id.clone(),
        })
        .await;
        Ok(true)
    }

    async fn update_user_fields(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), StoreError> {
        self.check_failure().await?;
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))?;
        if let Some(stored) = update.regresses_from(document) {
            return Err(StoreError::ProgressRegressed {
                stored,
                attempted: update.progress().unwrap_or_default(),
            });
        }
        let patch = update.into_patch();
        merge_document(document, patch.clone());
        self.publish_progress(user_id, &patch);
        drop(documents);

        self.record(RecordedWrite::Update {
            user_id: user_id.clone(),
            patch,
        })
        .await;
        Ok(())
    }

    async fn replace_field(
        &self,
        user_id: &UserId,
        field: ProfileField,
        value: Value,
    ) -> Result<(), StoreError> {
        self.check_failure().await?;
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))?;
        document.insert(field.key().to_string(), value.clone());
        drop(documents);

        self.record(RecordedWrite::Replace {
            user_id: user_id.clone(),
            field,
            value,
        })
        .await;
        Ok(())
    }

    async fn load_document(&self, user_id: &UserId) -> Result<Option<UserDocument>, StoreError> {
        self.check_failure().await?;
        Ok(self.documents.read().await.get(user_id).cloned())
    }
}

impl ProgressSubscriber for InMemoryDocumentStore {
    fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<String> {
        self.feed.subscribe(user_id)
    }
}
