//! Application layer - Commands, Handlers and the flow driver.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers persist screen answers; the flow driver is the only place that
//! moves the wizard to another screen.

mod error;
mod flow_driver;
mod gate;
pub mod handlers;

pub use error::OnboardingError;
pub use flow_driver::{FlowDriver, FlowEvent, FlowHandle};
pub use gate::{GateGuard, ScreenGate};
pub use handlers::{
    AbandonReport, CompleteScreenCommand, CompleteScreenHandler, CompleteScreenResult,
    PhotoUploadHandler, PhotoUploadResult, PhotoUploadSession, RegisterUserHandler,
    RegisterUserResult, ResumeOnboardingHandler, ResumeOnboardingResult,
    SendVerificationCodeCommand, SendVerificationCodeHandler, StartPhotoUploadCommand,
};
