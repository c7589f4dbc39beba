//! RegisterUserHandler - creates the onboarding document after sign-in.

use std::sync::Arc;

use serde_json::Value;

use crate::application::OnboardingError;
use crate::domain::foundation::UserId;
use crate::domain::profile::{UserDocument, CREATED_AT_KEY, PROGRESS_KEY};
use crate::domain::signup::SignupProgress;
use crate::ports::{Clock, SessionProvider, StoreError, UserDocumentStore};

/// Result of registering the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserResult {
    pub user_id: UserId,
    /// False when the user already had a document (a returning user).
    pub created: bool,
}

/// Handler for creating the user's document at `initial`.
pub struct RegisterUserHandler {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn UserDocumentStore>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserHandler {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        store: Arc<dyn UserDocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            store,
            clock,
        }
    }

    pub async fn handle(&self) -> Result<RegisterUserResult, OnboardingError> {
        let user_id = self
            .session
            .current_user()
            .ok_or(OnboardingError::MissingSession)?;

        let created_at = serde_json::to_value(self.clock.now()).map_err(|e| {
            OnboardingError::RemoteWrite(StoreError::Serialization(e.to_string()))
        })?;
        let mut initial = UserDocument::new();
        initial.insert(
            PROGRESS_KEY.to_string(),
            Value::String(SignupProgress::Initial.as_str().to_string()),
        );
        initial.insert(CREATED_AT_KEY.to_string(), created_at);

        let created = self
            .store
            .create_if_absent(&user_id, initial)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to create user document");
                OnboardingError::RemoteWrite(e)
            })?;

        if created {
            tracing::info!(user_id = %user_id, "Created onboarding document");
        }

        Ok(RegisterUserResult { user_id, created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use serde_json::json;

    fn handler(fx: &Fixture) -> RegisterUserHandler {
        RegisterUserHandler::new(fx.session.clone(), fx.store.clone(), fx.clock.clone())
    }

    #[tokio::test]
    async fn first_sign_in_creates_document_at_initial() {
        let fx = Fixture::new();
        let result = handler(&fx).handle().await.unwrap();

        assert!(result.created);
        let doc = fx.store.load_document(&fx.user_id).await.unwrap().unwrap();
        assert_eq!(doc[PROGRESS_KEY], json!("initial"));
        assert!(doc.contains_key(CREATED_AT_KEY));
    }

    #[tokio::test]
    async fn returning_user_keeps_existing_progress() {
        let fx = Fixture::new();
        fx.seed_progress("heightComplete").await;

        let result = handler(&fx).handle().await.unwrap();

        assert!(!result.created);
        let doc = fx.store.load_document(&fx.user_id).await.unwrap().unwrap();
        assert_eq!(doc[PROGRESS_KEY], json!("heightComplete"));
    }

    #[tokio::test]
    async fn missing_session_issues_no_request() {
        let fx = Fixture::new();
        fx.session.sign_out();

        assert_eq!(
            handler(&fx).handle().await.unwrap_err(),
            OnboardingError::MissingSession
        );
        assert_eq!(fx.store.write_count().await, 0);
    }
}
