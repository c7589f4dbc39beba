//! Continue gating: at most one outstanding request per screen.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use super::OnboardingError;
use crate::domain::profile::{ScreenSubmission, ValidationContext};
use crate::domain::signup::Screen;

/// Tracks which screens have a request in flight.
#[derive(Debug, Clone, Default)]
pub struct ScreenGate {
    outstanding: Arc<Mutex<HashSet<Screen>>>,
}

impl ScreenGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the continue control should be enabled for this input.
    pub fn can_continue(&self, submission: &ScreenSubmission, ctx: &ValidationContext) -> bool {
        !self.is_outstanding(submission.screen()) && submission.validate(ctx).is_ok()
    }

    pub fn is_outstanding(&self, screen: Screen) -> bool {
        self.outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&screen)
    }

    /// Marks a request for `screen` as outstanding until the guard drops.
    pub fn begin(&self, screen: Screen) -> Result<GateGuard, OnboardingError> {
        let mut outstanding = self
            .outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !outstanding.insert(screen) {
            return Err(OnboardingError::SubmissionInFlight(screen));
        }
        Ok(GateGuard {
            gate: self.clone(),
            screen,
        })
    }
}

/// Releases the screen's slot when dropped.
#[derive(Debug)]
pub struct GateGuard {
    gate: ScreenGate,
    screen: Screen,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate
            .outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.screen);
    }
}
