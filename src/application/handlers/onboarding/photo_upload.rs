//! Photo screen: concurrent uploads with bulk cancellation.
//!
//! [`PhotoUploadHandler::start`] validates the picked assets and starts one
//! upload task per asset. The returned [`PhotoUploadSession`] either
//! finishes (saving the `photos` field, then progress `photosComplete`, as
//! two sequential writes) or is abandoned, which aborts every outstanding
//! upload, asks storage to cancel it, and writes nothing.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::{FlowEvent, GateGuard, OnboardingError, ScreenGate};
use crate::domain::foundation::UserId;
use crate::domain::profile::{
    PhotoAsset, PhotoKey, PhotoLocator, PhotoRules, ProfileField, ProfileUpdate,
};
use crate::domain::signup::{Screen, SignupProgress};
use crate::ports::{PhotoStorage, SessionProvider, StorageError, StoreError, UserDocumentStore};

/// Command to start uploading the picked photos.
#[derive(Debug, Clone)]
pub struct StartPhotoUploadCommand {
    pub current: SignupProgress,
    pub assets: Vec<PhotoAsset>,
}

/// Outcome of a finished photo screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUploadResult {
    pub locators: Vec<PhotoLocator>,
    pub progress: SignupProgress,
}

/// Outcome of abandoning the photo screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonReport {
    /// Uploads that were still in flight and got cancelled.
    pub cancelled: Vec<PhotoKey>,
    /// Uploads that had already finished.
    pub completed: usize,
}

/// Starts photo upload sessions.
pub struct PhotoUploadHandler {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn UserDocumentStore>,
    storage: Arc<dyn PhotoStorage>,
    gate: ScreenGate,
    rules: PhotoRules,
    flow_events: Option<mpsc::Sender<FlowEvent>>,
}

impl PhotoUploadHandler {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        store: Arc<dyn UserDocumentStore>,
        storage: Arc<dyn PhotoStorage>,
        gate: ScreenGate,
        rules: PhotoRules,
    ) -> Self {
        Self {
            session,
            store,
            storage,
            gate,
            rules,
            flow_events: None,
        }
    }

    pub fn with_flow_events(mut self, sender: mpsc::Sender<FlowEvent>) -> Self {
        self.flow_events = Some(sender);
        self
    }

    pub fn rules(&self) -> PhotoRules {
        self.rules
    }

    /// Validates the assets and starts one upload per asset.
    pub fn start(&self, cmd: StartPhotoUploadCommand) -> Result<PhotoUploadSession, OnboardingError> {
        let user_id = self
            .session
            .current_user()
            .ok_or(OnboardingError::MissingSession)?;
        if Screen::Photos.entry_progress() != cmd.current {
            return Err(OnboardingError::ProgressOutOfOrder {
                current: cmd.current,
                submitted: Screen::Photos,
            });
        }

        let guard = self.gate.begin(Screen::Photos)?;
        self.rules.validate(&cmd.assets)?;

        let uploads = cmd
            .assets
            .into_iter()
            .map(|asset| {
                let key = PhotoKey::for_asset(&user_id, &asset);
                let storage = Arc::clone(&self.storage);
                let task_key = key.clone();
                let handle = tokio::spawn(async move { storage.upload(&task_key, &asset).await });
                PendingUpload { key, handle }
            })
            .collect::<Vec<_>>();

        tracing::info!(user_id = %user_id, count = uploads.len(), "Started photo uploads");

        Ok(PhotoUploadSession {
            user_id,
            store: Arc::clone(&self.store),
            storage: Arc::clone(&self.storage),
            uploads,
            flow_events: self.flow_events.clone(),
            _guard: guard,
        })
    }
}

#[derive(Debug)]
struct PendingUpload {
    key: PhotoKey,
    handle: JoinHandle<Result<PhotoLocator, StorageError>>,
}

/// The set of uploads started from one photo screen submission.
///
/// Dropping the session without finishing or abandoning it aborts the
/// outstanding tasks but cannot ask storage to clean up; prefer
/// [`abandon`](Self::abandon).
pub struct PhotoUploadSession {
    user_id: UserId,
    store: Arc<dyn UserDocumentStore>,
    storage: Arc<dyn PhotoStorage>,
    uploads: Vec<PendingUpload>,
    flow_events: Option<mpsc::Sender<FlowEvent>>,
    _guard: GateGuard,
}

impl PhotoUploadSession {
    /// Storage keys of every upload in this session, in pick order.
    pub fn keys(&self) -> Vec<PhotoKey> {
        self.uploads.iter().map(|u| u.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Uploads whose task has finished, successfully or not.
    pub fn finished_count(&self) -> usize {
        self.uploads
            .iter()
            .filter(|u| u.handle.is_finished())
            .count()
    }

    pub fn in_flight_count(&self) -> usize {
        self.len() - self.finished_count()
    }

    /// Waits for every upload, then saves the locators and advances progress.
    ///
    /// If any upload fails the remaining ones are cancelled and nothing is
    /// written.
    pub async fn finish(mut self) -> Result<PhotoUploadResult, OnboardingError> {
        let mut pending = std::mem::take(&mut self.uploads).into_iter();
        let mut locators = Vec::with_capacity(pending.len());

        while let Some(upload) = pending.next() {
            let outcome = match upload.handle.await {
                Ok(result) => result,
                Err(join_error) => Err(StorageError::Cancelled(join_error.to_string())),
            };
            match outcome {
                Ok(locator) => locators.push(locator),
                Err(e) => {
                    tracing::warn!(
                        user_id = %self.user_id,
                        key = %upload.key,
                        error = %e,
                        "Photo upload failed, cancelling the rest"
                    );
                    let rest: Vec<PendingUpload> = pending.collect();
                    cancel_all(self.storage.as_ref(), rest).await;
                    return Err(match e {
                        StorageError::Cancelled(_) => OnboardingError::UploadsAbandoned,
                        other => OnboardingError::Upload(other),
                    });
                }
            }
        }

        // Two sequential writes; a crash in between leaves progress at
        // locationComplete and the screen is shown again on relaunch.
        let photos = serde_json::to_value(&locators).map_err(|e| {
            OnboardingError::RemoteWrite(StoreError::Serialization(e.to_string()))
        })?;
        self.write_photos(photos).await?;

        let progress = SignupProgress::PhotosComplete;
        self.store
            .update_user_fields(&self.user_id, ProfileUpdate::new().with_progress(progress))
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %self.user_id, error = %e, "Failed to advance past photos");
                OnboardingError::RemoteWrite(e)
            })?;

        tracing::info!(user_id = %self.user_id, count = locators.len(), "Photos saved");

        if let Some(events) = &self.flow_events {
            if events
                .send(FlowEvent::ScreenCompleted { progress })
                .await
                .is_err()
            {
                tracing::debug!("Flow driver stopped before photo completion event");
            }
        }

        Ok(PhotoUploadResult { locators, progress })
    }

    /// Cancels every outstanding upload. Issues no document writes.
    pub async fn abandon(mut self) -> AbandonReport {
        let uploads = std::mem::take(&mut self.uploads);
        let (done, outstanding): (Vec<_>, Vec<_>) =
            uploads.into_iter().partition(|u| u.handle.is_finished());

        let cancelled = cancel_all(self.storage.as_ref(), outstanding).await;
        tracing::info!(
            user_id = %self.user_id,
            cancelled = cancelled.len(),
            completed = done.len(),
            "Photo screen abandoned"
        );

        AbandonReport {
            cancelled,
            completed: done.len(),
        }
    }

    async fn write_photos(&self, photos: Value) -> Result<(), OnboardingError> {
        self.store
            .replace_field(&self.user_id, ProfileField::Photos, photos)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %self.user_id, error = %e, "Failed to save photos");
                OnboardingError::RemoteWrite(e)
            })
    }
}

impl std::fmt::Debug for PhotoUploadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUploadSession")
            .field("user_id", &self.user_id)
            .field("uploads", &self.uploads)
            .finish_non_exhaustive()
    }
}

impl Drop for PhotoUploadSession {
    fn drop(&mut self) {
        for upload in &self.uploads {
            if !upload.handle.is_finished() {
                tracing::warn!(key = %upload.key, "Photo upload dropped without cancellation");
                upload.handle.abort();
            }
        }
    }
}

/// Aborts each task, then asks storage to cancel every key concurrently.
async fn cancel_all(storage: &dyn PhotoStorage, uploads: Vec<PendingUpload>) -> Vec<PhotoKey> {
    let keys: Vec<PhotoKey> = uploads
        .into_iter()
        .map(|upload| {
            upload.handle.abort();
            upload.key
        })
        .collect();

    let outcomes = join_all(keys.iter().map(|key| storage.cancel(key))).await;
    for (key, outcome) in keys.iter().zip(outcomes) {
        if let Err(e) = outcome {
            tracing::warn!(key = %key, error = %e, "Storage could not cancel upload");
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryPhotoStorage, LocalPhotoStorage, RecordedWrite};
    use crate::application::handlers::fixtures::Fixture;
    use crate::domain::profile::PROGRESS_KEY;
    use serde_json::json;
    use std::time::Duration;

    fn handler(fx: &Fixture, storage: Arc<InMemoryPhotoStorage>) -> PhotoUploadHandler {
        PhotoUploadHandler::new(
            fx.session.clone(),
            fx.store.clone(),
            storage,
            fx.gate.clone(),
            PhotoRules::default(),
        )
    }

    fn jpegs(count: usize) -> Vec<PhotoAsset> {
        (0..count)
            .map(|i| PhotoAsset::new("image/jpeg", vec![0xFF, 0xD8, i as u8]))
            .collect()
    }

    fn start_cmd(count: usize) -> StartPhotoUploadCommand {
        StartPhotoUploadCommand {
            current: SignupProgress::LocationComplete,
            assets: jpegs(count),
        }
    }

    async fn wait_until_finished(session: &PhotoUploadSession, count: usize) {
        while session.finished_count() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn finish_writes_photos_then_progress() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::new());

        let session = handler(&fx, storage.clone()).start(start_cmd(2)).unwrap();
        let result = session.finish().await.unwrap();

        assert_eq!(result.locators.len(), 2);
        assert_eq!(result.progress, SignupProgress::PhotosComplete);

        let writes = fx.store.writes().await;
        assert_eq!(writes.len(), 2);
        assert!(matches!(
            &writes[0],
            RecordedWrite::Replace { field: ProfileField::Photos, value, .. }
                if value.as_array().map(Vec::len) == Some(2)
        ));
        let RecordedWrite::Update { patch, .. } = &writes[1] else {
            panic!("expected progress update, got {:?}", writes[1]);
        };
        assert_eq!(patch[PROGRESS_KEY], json!("photosComplete"));
    }

    #[tokio::test]
    async fn abandon_cancels_in_flight_uploads_without_writes() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::gated());

        let session = handler(&fx, storage.clone()).start(start_cmd(6)).unwrap();
        storage.release(3);
        wait_until_finished(&session, 3).await;

        let report = session.abandon().await;

        assert_eq!(report.completed, 3);
        assert_eq!(report.cancelled.len(), 3);
        assert_eq!(storage.cancelled().await.len(), 3);
        assert_eq!(fx.store.write_count().await, 0);

        // Late permits must not revive aborted uploads.
        storage.release(3);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(storage.uploaded_count().await, 3);
        assert_eq!(fx.store.write_count().await, 0);
    }

    #[tokio::test]
    async fn abandon_leaves_no_local_files_for_cancelled_uploads() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = Arc::new(LocalPhotoStorage::new(temp_dir.path()));
        let handler = PhotoUploadHandler::new(
            fx.session.clone(),
            fx.store.clone(),
            storage.clone(),
            fx.gate.clone(),
            PhotoRules::default(),
        );
        let assets = (0..6)
            .map(|i| PhotoAsset::new("image/jpeg", vec![i as u8; 1 << 20]))
            .collect();

        let session = handler
            .start(StartPhotoUploadCommand {
                current: SignupProgress::LocationComplete,
                assets,
            })
            .unwrap();
        let report = session.abandon().await;

        // Blocking writes outlive the aborted tasks; give them time to land.
        tokio::time::sleep(Duration::from_millis(200)).await;
        for key in &report.cancelled {
            assert!(!storage.partial_path(key).exists(), "partial left for {}", key);
            assert!(!storage.blob_path(key).exists(), "blob left for {}", key);
        }
        assert_eq!(fx.store.write_count().await, 0);
    }

    #[tokio::test]
    async fn abandon_frees_the_photo_screen() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::gated());
        let handler = handler(&fx, storage.clone());

        let session = handler.start(start_cmd(1)).unwrap();
        assert!(matches!(
            handler.start(start_cmd(1)),
            Err(OnboardingError::SubmissionInFlight(Screen::Photos))
        ));

        session.abandon().await;
        assert!(!fx.gate.is_outstanding(Screen::Photos));
    }

    #[tokio::test]
    async fn upload_failure_writes_nothing() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::new());
        storage
            .fail_with(StorageError::Unavailable("quota exceeded".into()))
            .await;

        let session = handler(&fx, storage.clone()).start(start_cmd(3)).unwrap();
        let result = session.finish().await;

        assert!(matches!(result, Err(OnboardingError::Upload(_))));
        assert_eq!(fx.store.write_count().await, 0);
    }

    #[tokio::test]
    async fn upload_cancelled_by_storage_reports_abandoned() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::new());
        storage
            .fail_with(StorageError::Cancelled("photo-1".into()))
            .await;

        let session = handler(&fx, storage).start(start_cmd(1)).unwrap();

        assert_eq!(
            session.finish().await.unwrap_err(),
            OnboardingError::UploadsAbandoned
        );
        assert_eq!(fx.store.write_count().await, 0);
    }

    #[tokio::test]
    async fn too_many_photos_start_nothing() {
        let fx = Fixture::new();
        fx.seed_progress("locationComplete").await;
        let storage = Arc::new(InMemoryPhotoStorage::new());

        let result = handler(&fx, storage.clone()).start(start_cmd(7));

        assert!(matches!(result, Err(OnboardingError::Validation(_))));
        assert_eq!(storage.uploaded_count().await, 0);
        assert!(!fx.gate.is_outstanding(Screen::Photos));
    }

    #[tokio::test]
    async fn photos_cannot_start_before_location() {
        let fx = Fixture::new();
        let storage = Arc::new(InMemoryPhotoStorage::new());

        let result = handler(&fx, storage).start(StartPhotoUploadCommand {
            current: SignupProgress::DrugsComplete,
            assets: jpegs(1),
        });

        assert!(matches!(
            result,
            Err(OnboardingError::ProgressOutOfOrder { .. })
        ));
    }
}
