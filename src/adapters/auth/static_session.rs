//! Static session adapter.
//!
//! Holds the signed-in user in memory. The CLI signs in with the identifier
//! passed on the command line; tests flip between signed-in and signed-out.
//!
//! # Example
//!
//! ```ignore
//! let session = StaticSessionProvider::signed_in(UserId::new("uid-1")?);
//! assert!(session.current_user().is_some());
//! session.sign_out();
//! assert!(session.current_user().is_none());
//! ```

use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::UserId;
use crate::ports::SessionProvider;

#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    user: RwLock<Option<UserId>>,
}

impl StaticSessionProvider {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user_id)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: UserId) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user_id);
    }

    /// Ends the session; later screen submissions fail with a missing session.
    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_user(&self) -> Option<UserId> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
