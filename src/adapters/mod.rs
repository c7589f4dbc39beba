//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the onboarding flow to its collaborators:
//! - `store` - User document stores (in-memory, YAML files)
//! - `storage` - Photo blob storage (in-memory, local directory)
//! - `auth` - Session provider
//! - `verification` - Email verification codes
//! - `clock` - System and fixed clocks

pub mod auth;
pub mod clock;
pub mod storage;
pub mod store;
pub mod verification;

pub use auth::StaticSessionProvider;
pub use clock::{FixedClock, SystemClock};
pub use storage::{InMemoryPhotoStorage, LocalPhotoStorage};
pub use store::{FileDocumentStore, InMemoryDocumentStore, ProgressFeed, RecordedWrite};
pub use verification::InMemoryEmailVerifier;
