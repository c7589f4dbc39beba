//! FlowDriver - the single event queue in front of the flow controller.
//!
//! Screen handlers and the document store subscription both send
//! [`FlowEvent`]s into one channel. The driver applies them one at a time
//! and publishes the visible [`Step`] on a watch channel.

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::signup::{FlowController, FlowTransition, SignupProgress, Step};

const EVENT_BUFFER: usize = 32;

/// Something that may move the wizard forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A screen persisted its answer and the new progress.
    ScreenCompleted { progress: SignupProgress },
    /// The document store reported a progress identifier.
    RemoteProgress { identifier: String },
}

/// Client side of a running driver.
#[derive(Debug, Clone)]
pub struct FlowHandle {
    events: mpsc::Sender<FlowEvent>,
    steps: watch::Receiver<Step>,
}

impl FlowHandle {
    /// Sender for screen handlers.
    pub fn events(&self) -> mpsc::Sender<FlowEvent> {
        self.events.clone()
    }

    pub fn steps(&self) -> watch::Receiver<Step> {
        self.steps.clone()
    }

    pub fn current_step(&self) -> Step {
        *self.steps.borrow()
    }

    /// Forwards store notifications into the event queue until either side
    /// closes.
    pub fn forward_remote(&self, mut remote: broadcast::Receiver<String>) -> JoinHandle<()> {
        let events = self.events.clone();
        tokio::spawn(async move {
            loop {
                match remote.recv().await {
                    Ok(identifier) => {
                        if events
                            .send(FlowEvent::RemoteProgress { identifier })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Progress notifications dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Owns the controller and applies queued events in order.
#[derive(Debug)]
pub struct FlowDriver {
    controller: FlowController,
    events: mpsc::Receiver<FlowEvent>,
    steps: watch::Sender<Step>,
}

impl FlowDriver {
    pub fn new(controller: FlowController) -> (Self, FlowHandle) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (steps_tx, steps_rx) = watch::channel(controller.current_step());
        let driver = Self {
            controller,
            events: events_rx,
            steps: steps_tx,
        };
        let handle = FlowHandle {
            events: events_tx,
            steps: steps_rx,
        };
        (driver, handle)
    }

    pub fn controller(&self) -> &FlowController {
        &self.controller
    }

    /// Applies one event and publishes the step if it changed.
    pub fn apply(&mut self, event: FlowEvent) -> FlowTransition {
        let reported = match &event {
            FlowEvent::ScreenCompleted { progress } => *progress,
            FlowEvent::RemoteProgress { identifier } => SignupProgress::from_persisted(identifier),
        };

        let transition = self.controller.on_progress_changed(reported);
        match transition {
            FlowTransition::Advanced { from, to } => {
                tracing::info!(
                    from = %from.screen(),
                    to = %to.screen(),
                    step = to.index(),
                    "Advanced onboarding step"
                );
            }
            FlowTransition::HandedOff { from } => {
                tracing::info!(from = %from.screen(), "Onboarding complete, handing off");
            }
            FlowTransition::Regressed { current, reported } => {
                tracing::warn!(%current, %reported, "Ignoring backward progress change");
            }
            FlowTransition::Unchanged | FlowTransition::AlreadyHandedOff => {
                tracing::debug!(?event, ?transition, "Ignoring progress event");
            }
        }

        if transition.is_navigation() {
            self.steps.send_replace(self.controller.current_step());
        }
        transition
    }

    /// Processes events until hand-off or until every sender is gone.
    pub async fn run(mut self) -> FlowController {
        while !self.controller.is_handed_off() {
            match self.events.recv().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
        self.controller
    }

    /// Spawns [`run`](Self::run) on the runtime.
    pub fn spawn(self) -> JoinHandle<FlowController> {
        tokio::spawn(self.run())
    }
}
