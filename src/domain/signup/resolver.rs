//! Step resolution - maps a progress value to the screen to display.
//!
//! Used both when a returning user opens the app and whenever progress
//! changes mid-flow. Pure and total.

use serde::{Deserialize, Serialize};

use super::{Screen, SignupProgress};

/// The position of the displayed screen within the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    index: usize,
    screen: Screen,
}

impl Step {
    /// The first step of the flow.
    pub fn first() -> Self {
        step_for_progress(SignupProgress::Initial)
    }

    /// Returns the 0-based step index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the screen bound to this step.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns true for the hand-off step.
    pub fn is_terminal(&self) -> bool {
        self.screen.is_terminal()
    }

    /// Number of steps in the flow, including the hand-off.
    pub fn count() -> usize {
        Screen::all().len()
    }
}

/// Resolves the step for a progress value.
///
/// # Panics
///
/// Panics if the screen table has no entry at the resolved index. That can
/// only happen if `Screen::all()` and `SignupProgress::all()` drift apart,
/// which is a build-time configuration error.
pub fn step_for_progress(progress: SignupProgress) -> Step {
    let index = progress.rank();
    let screen = Screen::for_progress(progress);
    assert_eq!(
        Screen::at(index),
        Some(screen),
        "screen table out of sync with progress order at index {}",
        index
    );
    Step { index, screen }
}

/// Resolves the step for a stored identifier; unknown values map to step 0.
pub fn step_for_identifier(identifier: &str) -> Step {
    step_for_progress(SignupProgress::from_persisted(identifier))
}
