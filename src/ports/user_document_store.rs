//! UserDocumentStore port - the remote per-user profile document.
//!
//! Every operation is a single round trip. There is no query layer and no
//! transaction spanning more than one call.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::UserId;
use crate::domain::profile::{ProfileField, ProfileUpdate, UserDocument};
use crate::domain::signup::SignupProgress;

/// Errors that can occur talking to the document store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No document exists for user {0}")]
    NotFound(UserId),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    /// The write carried a milestone earlier than the stored one.
    #[error("Progress is already at {stored}, refusing to move back to {attempted}")]
    ProgressRegressed {
        stored: SignupProgress,
        attempted: SignupProgress,
    },
}

/// Port for reading and writing the user's onboarding document
#[async_trait]
pub trait UserDocumentStore: Send + Sync {
    /// Create the document with `initial` fields unless one already exists.
    ///
    /// Returns `true` when a new document was created.
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        initial: UserDocument,
    ) -> Result<bool, StoreError>;

    /// Merge the update into the existing document.
    ///
    /// Nested objects merge key by key; everything else is overwritten.
    /// Progress only moves forward: the check against the stored milestone
    /// happens inside the same write.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the document does not exist and
    /// `StoreError::ProgressRegressed` if the update's progress is earlier
    /// than the stored progress. Nothing is written in either case.
    async fn update_user_fields(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), StoreError>;

    /// Replace a single field wholesale, discarding any previous value.
    async fn replace_field(
        &self,
        user_id: &UserId,
        field: ProfileField,
        value: Value,
    ) -> Result<(), StoreError>;

    /// Load the current document, if any.
    async fn load_document(&self, user_id: &UserId) -> Result<Option<UserDocument>, StoreError>;
}
