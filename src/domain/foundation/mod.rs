//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait and
//! error types that form the vocabulary of the onboarding domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{AssetId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
