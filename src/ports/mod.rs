//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the onboarding domain and the collaborators it relies on. Adapters
//! implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `SessionProvider` - Identifier of the signed-in user
//! - `UserDocumentStore` - Per-user profile document (merge and replace writes)
//! - `ProgressSubscriber` - Notifications when the stored progress changes
//! - `PhotoStorage` - Cancelable blob uploads for profile photos
//! - `EmailVerifier` - One-time email verification codes
//! - `Clock` - Current time for the age gate

mod clock;
mod email_verifier;
mod photo_storage;
mod progress_subscriber;
mod session_provider;
mod user_document_store;

pub use clock::Clock;
pub use email_verifier::{EmailVerifier, VerificationError};
pub use photo_storage::{PhotoStorage, StorageError};
pub use progress_subscriber::ProgressSubscriber;
pub use session_provider::SessionProvider;
pub use user_document_store::{StoreError, UserDocumentStore};
