//! FlowController - owns the current step of the wizard.
//!
//! The controller is the only component allowed to change which screen is
//! visible. Screens report the progress they persisted; the document store
//! reports progress it observed. Both arrive here as plain values.

use super::{step_for_identifier, step_for_progress, SignupProgress, Step};

/// Outcome of feeding a progress change to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTransition {
    /// Reported progress equals the known progress; nothing to do.
    Unchanged,
    /// Reported progress is behind the known progress; ignored.
    Regressed {
        current: SignupProgress,
        reported: SignupProgress,
    },
    /// The flow already handed off to the application shell.
    AlreadyHandedOff,
    /// The visible step changed.
    Advanced { from: Step, to: Step },
    /// The terminal step was reached; control passes to the application.
    HandedOff { from: Step },
}

impl FlowTransition {
    /// Returns true if the visible step changed.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            FlowTransition::Advanced { .. } | FlowTransition::HandedOff { .. }
        )
    }
}

/// Navigation state of one onboarding session.
#[derive(Debug, Clone)]
pub struct FlowController {
    progress: SignupProgress,
    step: Step,
    handed_off: bool,
}

impl FlowController {
    /// Mounts the controller from whatever progress is stored for the user.
    ///
    /// `None` (no record yet) and unrecognized identifiers start at step 0.
    pub fn resume(stored: Option<&str>) -> Self {
        let step = stored.map(step_for_identifier).unwrap_or_else(Step::first);
        let progress = step.screen().entry_progress();
        Self {
            progress,
            step,
            handed_off: step.is_terminal(),
        }
    }

    /// Mounts the controller at a known progress value.
    pub fn at(progress: SignupProgress) -> Self {
        let step = step_for_progress(progress);
        Self {
            progress,
            step,
            handed_off: step.is_terminal(),
        }
    }

    /// Returns the last progress value the controller accepted.
    pub fn progress(&self) -> SignupProgress {
        self.progress
    }

    /// Returns the visible step.
    pub fn current_step(&self) -> Step {
        self.step
    }

    /// Returns true once the terminal step was reached this session.
    pub fn is_handed_off(&self) -> bool {
        self.handed_off
    }

    /// Applies a progress-change notification.
    pub fn on_progress_changed(&mut self, reported: SignupProgress) -> FlowTransition {
        if self.handed_off {
            return FlowTransition::AlreadyHandedOff;
        }
        if reported == self.progress {
            return FlowTransition::Unchanged;
        }
        if reported < self.progress {
            return FlowTransition::Regressed {
                current: self.progress,
                reported,
            };
        }

        let from = self.step;
        let to = step_for_progress(reported);
        self.progress = reported;
        self.step = to;

        if to.is_terminal() {
            self.handed_off = true;
            FlowTransition::HandedOff { from }
        } else {
            FlowTransition::Advanced { from, to }
        }
    }
}

impl Default for FlowController {
    fn default() -> Self {
        Self::at(SignupProgress::Initial)
    }
}
