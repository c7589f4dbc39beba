//! Domain layer containing onboarding logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `signup` - Progress milestones, screen table, step resolution and flow control
//! - `profile` - Screen answers, validation and document updates

pub mod foundation;
pub mod profile;
pub mod signup;
