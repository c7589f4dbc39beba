//! EmailVerifier port - one-time codes sent to the user's inbox.

use async_trait::async_trait;

use crate::domain::profile::{EmailAddress, VerificationCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("No code has been sent to {0}")]
    NoPendingCode(String),

    #[error("Verification service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait EmailVerifier: Send + Sync {
    /// Send a fresh code, replacing any earlier one for the address.
    async fn send_code(&self, email: &EmailAddress) -> Result<(), VerificationError>;

    /// Returns `Ok(false)` for a wrong code.
    async fn confirm_code(
        &self,
        email: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<bool, VerificationError>;
}
