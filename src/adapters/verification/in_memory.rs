//! In-memory email verifier.
//!
//! Generates random six digit codes and keeps them instead of sending mail.
//! The CLI prints the code as a stand-in inbox; tests read it back with
//! [`InMemoryEmailVerifier::sent_code`].

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::profile::{EmailAddress, VerificationCode, VERIFICATION_CODE_LEN};
use crate::ports::{EmailVerifier, VerificationError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryEmailVerifier {
    pending: Arc<RwLock<HashMap<EmailAddress, String>>>,
    force_error: Arc<RwLock<Option<VerificationError>>>,
}

impl InMemoryEmailVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The code most recently sent to `email`, if still pending.
    pub async fn sent_code(&self, email: &EmailAddress) -> Option<String> {
        self.pending.read().await.get(email).cloned()
    }

    pub async fn fail_with(&self, error: VerificationError) {
        *self.force_error.write().await = Some(error);
    }

    async fn check_failure(&self) -> Result<(), VerificationError> {
        match self.force_error.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn random_code() -> String {
    let upper = 10u32.pow(VERIFICATION_CODE_LEN as u32);
    let value = rand::thread_rng().gen_range(0..upper);
    format!("{:0width$}", value, width = VERIFICATION_CODE_LEN)
}

#[async_trait]
impl EmailVerifier for InMemoryEmailVerifier {
    async fn send_code(&self, email: &EmailAddress) -> Result<(), VerificationError> {
        self.check_failure().await?;
        let code = random_code();
        tracing::debug!(email = %email, "Verification code issued");
        self.pending.write().await.insert(email.clone(), code);
        Ok(())
    }

    async fn confirm_code(
        &self,
        email: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<bool, VerificationError> {
        self.check_failure().await?;
        let mut pending = self.pending.write().await;
        match pending.get(email) {
            None => Err(VerificationError::NoPendingCode(email.to_string())),
            Some(expected) if expected == code.as_str() => {
                pending.remove(email);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}
