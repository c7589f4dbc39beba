//! ResumeOnboardingHandler - mounts the flow from the stored document.

use std::sync::Arc;

use serde_json::Value;

use crate::application::OnboardingError;
use crate::domain::foundation::UserId;
use crate::domain::profile::{UserDraftProfile, PROGRESS_KEY};
use crate::domain::signup::FlowController;
use crate::ports::{SessionProvider, UserDocumentStore};

/// Where the signed-in user left off.
#[derive(Debug, Clone)]
pub struct ResumeOnboardingResult {
    pub user_id: UserId,
    pub controller: FlowController,
    /// Answers saved so far; empty if the document could not be decoded.
    pub draft: UserDraftProfile,
}

pub struct ResumeOnboardingHandler {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn UserDocumentStore>,
}

impl ResumeOnboardingHandler {
    pub fn new(session: Arc<dyn SessionProvider>, store: Arc<dyn UserDocumentStore>) -> Self {
        Self { session, store }
    }

    pub async fn handle(&self) -> Result<ResumeOnboardingResult, OnboardingError> {
        let user_id = self
            .session
            .current_user()
            .ok_or(OnboardingError::MissingSession)?;

        let document = self
            .store
            .load_document(&user_id)
            .await
            .map_err(OnboardingError::RemoteRead)?;

        let stored = document
            .as_ref()
            .and_then(|doc| doc.get(PROGRESS_KEY))
            .and_then(Value::as_str);
        let controller = FlowController::resume(stored);

        let draft = match &document {
            Some(doc) => UserDraftProfile::from_document(doc).unwrap_or_else(|e| {
                tracing::warn!(user_id = %user_id, error = %e, "Stored profile could not be decoded");
                UserDraftProfile::default()
            }),
            None => UserDraftProfile::default(),
        };

        tracing::info!(
            user_id = %user_id,
            progress = %controller.progress(),
            screen = %controller.current_step().screen(),
            "Resuming onboarding"
        );

        Ok(ResumeOnboardingResult {
            user_id,
            controller,
            draft,
        })
    }
}
