//! CompleteScreenHandler - the shared "validate, persist, advance" action of
//! every data-collecting screen.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::{FlowEvent, OnboardingError, ScreenGate};
use crate::domain::profile::{
    EmailAddress, ScreenSubmission, ValidationContext, VerificationCode,
};
use crate::domain::foundation::StateMachine;
use crate::domain::signup::{Screen, SignupProgress};
use crate::ports::{Clock, EmailVerifier, SessionProvider, UserDocumentStore};

/// Command to complete the visible screen.
#[derive(Debug, Clone)]
pub struct CompleteScreenCommand {
    /// Progress the flow is currently at.
    pub current: SignupProgress,
    pub submission: ScreenSubmission,
}

/// The `completed(nextProgress)` outcome of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteScreenResult {
    pub screen: Screen,
    pub progress: SignupProgress,
}

/// Handler for completing a screen.
pub struct CompleteScreenHandler {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn UserDocumentStore>,
    verifier: Arc<dyn EmailVerifier>,
    clock: Arc<dyn Clock>,
    gate: ScreenGate,
    minimum_age: u32,
    flow_events: Option<mpsc::Sender<FlowEvent>>,
}

impl CompleteScreenHandler {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        store: Arc<dyn UserDocumentStore>,
        verifier: Arc<dyn EmailVerifier>,
        clock: Arc<dyn Clock>,
        gate: ScreenGate,
        minimum_age: u32,
    ) -> Self {
        Self {
            session,
            store,
            verifier,
            clock,
            gate,
            minimum_age,
            flow_events: None,
        }
    }

    /// Report completions to a running flow driver.
    pub fn with_flow_events(mut self, sender: mpsc::Sender<FlowEvent>) -> Self {
        self.flow_events = Some(sender);
        self
    }

    /// Validation inputs as of now.
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext::new(self.clock.now(), self.minimum_age)
    }

    /// Whether the continue control is enabled for this input.
    pub fn can_continue(&self, submission: &ScreenSubmission) -> bool {
        self.gate
            .can_continue(submission, &self.validation_context())
    }

    pub async fn handle(
        &self,
        cmd: CompleteScreenCommand,
    ) -> Result<CompleteScreenResult, OnboardingError> {
        let screen = cmd.submission.screen();

        // 1. Session and step checks
        let user_id = self
            .session
            .current_user()
            .ok_or(OnboardingError::MissingSession)?;
        if screen.entry_progress() != cmd.current {
            return Err(OnboardingError::ProgressOutOfOrder {
                current: cmd.current,
                submitted: screen,
            });
        }

        // 2. One outstanding request per screen
        let _guard = self.gate.begin(screen)?;

        // 3. Local validation; nothing is sent on failure
        let update = cmd.submission.validate(&self.validation_context())?;
        let progress = match update.progress() {
            Some(next) => cmd.current.transition_to(next)?,
            None => cmd.current,
        };

        if let ScreenSubmission::EmailVerify { email, code } = &cmd.submission {
            let email = EmailAddress::parse(email)?;
            let code = VerificationCode::parse(code)?;
            if !self.verifier.confirm_code(&email, &code).await? {
                return Err(OnboardingError::VerificationRejected);
            }
        }

        // 4. Persist fields and progress in one request
        self.store
            .update_user_fields(&user_id, update)
            .await
            .map_err(|e| {
                tracing::warn!(
                    user_id = %user_id,
                    screen = %screen,
                    error = %e,
                    "Failed to save screen"
                );
                OnboardingError::RemoteWrite(e)
            })?;

        tracing::info!(user_id = %user_id, screen = %screen, progress = %progress, "Screen completed");

        // 5. completed(nextProgress)
        if let Some(events) = &self.flow_events {
            if events
                .send(FlowEvent::ScreenCompleted { progress })
                .await
                .is_err()
            {
                tracing::debug!(screen = %screen, "Flow driver stopped before completion event");
            }
        }

        Ok(CompleteScreenResult { screen, progress })
    }
}
