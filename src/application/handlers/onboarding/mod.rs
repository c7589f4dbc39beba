//! Onboarding command handlers.

mod complete_screen;
mod photo_upload;
mod register_user;
mod resume_onboarding;
mod send_verification_code;

pub use complete_screen::{CompleteScreenCommand, CompleteScreenHandler, CompleteScreenResult};
pub use photo_upload::{
    AbandonReport, PhotoUploadHandler, PhotoUploadResult, PhotoUploadSession,
    StartPhotoUploadCommand,
};
pub use register_user::{RegisterUserHandler, RegisterUserResult};
pub use resume_onboarding::{ResumeOnboardingHandler, ResumeOnboardingResult};
pub use send_verification_code::{SendVerificationCodeCommand, SendVerificationCodeHandler};
