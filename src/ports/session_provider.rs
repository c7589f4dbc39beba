//! SessionProvider port - who is signed in right now.
//!
//! Authentication itself happens elsewhere (phone sign-in precedes the
//! wizard). The onboarding flow only needs the stable identifier, which it
//! treats as an opaque key.

use crate::domain::foundation::UserId;

/// Supplies the identifier of the authenticated user, if any.
pub trait SessionProvider: Send + Sync {
    /// Returns `None` when no session is established.
    fn current_user(&self) -> Option<UserId>;
}
