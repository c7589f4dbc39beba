//! Application handlers.
//!
//! Command handlers that validate screen input, talk to the collaborators
//! and report completions to the flow driver.

pub mod onboarding;

pub use onboarding::{
    AbandonReport, CompleteScreenCommand, CompleteScreenHandler, CompleteScreenResult,
    PhotoUploadHandler, PhotoUploadResult, PhotoUploadSession, RegisterUserHandler,
    RegisterUserResult, ResumeOnboardingHandler, ResumeOnboardingResult,
    SendVerificationCodeCommand, SendVerificationCodeHandler, StartPhotoUploadCommand,
};
