//! SendVerificationCodeHandler - emails a one-time code before the
//! email screen can be completed.

use std::sync::Arc;

use crate::application::OnboardingError;
use crate::domain::profile::EmailAddress;
use crate::ports::{EmailVerifier, SessionProvider};

#[derive(Debug, Clone)]
pub struct SendVerificationCodeCommand {
    pub email: String,
}

pub struct SendVerificationCodeHandler {
    session: Arc<dyn SessionProvider>,
    verifier: Arc<dyn EmailVerifier>,
}

impl SendVerificationCodeHandler {
    pub fn new(session: Arc<dyn SessionProvider>, verifier: Arc<dyn EmailVerifier>) -> Self {
        Self { session, verifier }
    }

    /// Returns the normalized address the code was sent to.
    pub async fn handle(
        &self,
        cmd: SendVerificationCodeCommand,
    ) -> Result<EmailAddress, OnboardingError> {
        self.session
            .current_user()
            .ok_or(OnboardingError::MissingSession)?;
        let email = EmailAddress::parse(&cmd.email)?;

        self.verifier.send_code(&email).await?;
        tracing::info!(email = %email, "Sent email verification code");

        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;

    fn handler(fx: &Fixture) -> SendVerificationCodeHandler {
        SendVerificationCodeHandler::new(fx.session.clone(), fx.verifier.clone())
    }

    #[tokio::test]
    async fn code_is_sent_to_normalized_address() {
        let fx = Fixture::new();
        let email = handler(&fx)
            .handle(SendVerificationCodeCommand {
                email: " Ada@Example.com ".into(),
            })
            .await
            .unwrap();

        assert_eq!(email.as_str(), "ada@example.com");
        assert!(fx.verifier.sent_code(&email).await.is_some());
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_locally() {
        let fx = Fixture::new();
        let result = handler(&fx)
            .handle(SendVerificationCodeCommand {
                email: "not-an-email".into(),
            })
            .await;
        assert!(matches!(result, Err(OnboardingError::Validation(_))));
    }
}
