//! Errors surfaced by the onboarding handlers.
//!
//! Every variant ends in a single modal message (see
//! [`OnboardingError::user_message`]); none of them is fatal to the process.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::signup::{Screen, SignupProgress};
use crate::ports::{StorageError, StoreError, VerificationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    /// No authenticated identifier is available.
    #[error("No authenticated session")]
    MissingSession,

    /// Local input failed validation; no request was issued.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The document store rejected or failed a write.
    #[error("Remote write failed: {0}")]
    RemoteWrite(StoreError),

    /// The document store could not be read.
    #[error("Remote read failed: {0}")]
    RemoteRead(StoreError),

    #[error("Photo upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Email verification failed: {0}")]
    Verification(#[from] VerificationError),

    #[error("The verification code does not match")]
    VerificationRejected,

    /// A request for this screen is already outstanding.
    #[error("A submission for {0} is already in flight")]
    SubmissionInFlight(Screen),

    /// The screen is not the one the stored progress points at.
    #[error("{submitted} cannot be submitted while progress is {current}")]
    ProgressOutOfOrder {
        current: SignupProgress,
        submitted: Screen,
    },

    #[error("Photo uploads were abandoned")]
    UploadsAbandoned,
}

impl OnboardingError {
    /// Text for the one-button alert shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            OnboardingError::MissingSession => {
                "You're signed out. Please sign in again to continue.".to_string()
            }
            OnboardingError::Validation(err) => err.to_string(),
            OnboardingError::RemoteWrite(StoreError::ProgressRegressed { .. })
            | OnboardingError::ProgressOutOfOrder { .. } => {
                "This step is out of date. Please continue from where you left off.".to_string()
            }
            OnboardingError::RemoteWrite(err) => {
                format!("We couldn't save your answer. {}", err)
            }
            OnboardingError::RemoteRead(err) => {
                format!("We couldn't load your profile. {}", err)
            }
            OnboardingError::Upload(err) => format!("We couldn't upload your photos. {}", err),
            OnboardingError::Verification(err) => {
                format!("We couldn't verify your email. {}", err)
            }
            OnboardingError::VerificationRejected => {
                "That code doesn't match. Check your inbox and try again.".to_string()
            }
            OnboardingError::SubmissionInFlight(_) => {
                "Hang on, we're still saving your answer.".to_string()
            }
            OnboardingError::UploadsAbandoned => {
                "Your photo upload was cancelled. Please pick your photos again.".to_string()
            }
        }
    }

    /// Returns true when the failure happened before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            OnboardingError::MissingSession
                | OnboardingError::Validation(_)
                | OnboardingError::SubmissionInFlight(_)
                | OnboardingError::ProgressOutOfOrder { .. }
        )
    }
}
