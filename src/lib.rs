//! Signup Flow - headless onboarding wizard for a dating app.
//!
//! A new user walks a fixed sequence of screens. Each screen validates its
//! input locally, persists its answers together with a new progress value in
//! a single write, and the flow driver resolves the next screen from that
//! progress. Returning users resume at the first unanswered screen.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
