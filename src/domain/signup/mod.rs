//! Signup module - progress model, screen table, step resolution and the
//! flow controller.

mod flow;
mod progress;
mod resolver;
mod screen;

pub use flow::{FlowController, FlowTransition};
pub use progress::{rank_of, SignupProgress};
pub use resolver::{step_for_identifier, step_for_progress, Step};
pub use screen::Screen;
