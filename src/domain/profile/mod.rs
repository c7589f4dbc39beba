//! Profile module - the answers each onboarding screen collects.
//!
//! Value objects validate raw screen input; `ScreenSubmission` turns one
//! screen's input into the single `ProfileUpdate` it persists.

mod birth_date;
mod choices;
mod contact;
mod draft;
mod height;
mod location;
mod name;
mod photo;
mod submission;
mod two_level;

pub use birth_date::{DateOfBirth, DateOfBirthInput, MIN_BIRTH_YEAR};
pub use choices::{
    require_choice, require_choices, Children, Education, Ethnicity, FamilyPlans, Habit,
    InterestedIn, Politics, Religion, Sexuality,
};
pub use contact::{EmailAddress, VerificationCode, VERIFICATION_CODE_LEN};
pub use draft::{
    merge_document, stored_progress, ProfileField, ProfileUpdate, UserDocument, UserDraftProfile,
    CREATED_AT_KEY, PROGRESS_KEY,
};
pub use height::{Height, MAX_HEIGHT_INCHES, MIN_HEIGHT_INCHES};
pub use location::Location;
pub use name::PersonName;
pub use photo::{PhotoAsset, PhotoKey, PhotoLocator, PhotoRules, SUPPORTED_CONTENT_TYPES};
pub use submission::{ScreenSubmission, ValidationContext};
pub use two_level::{
    DatingIntention, DatingIntentionDetail, Gender, GenderDetail, Refinement, TwoLevelChoice,
};
