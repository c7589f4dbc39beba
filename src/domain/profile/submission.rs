//! Screen submissions: the local input of one screen at the moment the user
//! presses continue.
//!
//! Validation is pure. A submission that validates becomes exactly one
//! [`ProfileUpdate`] carrying the screen's fields and its completion progress.

use chrono::NaiveDate;

use super::{
    require_choice, require_choices, Children, DateOfBirth, DateOfBirthInput,
    DatingIntentionDetail, EmailAddress, Education, Ethnicity, FamilyPlans, GenderDetail, Habit,
    Height, InterestedIn, Location, PersonName, Politics, ProfileField, ProfileUpdate, Religion,
    Sexuality, TwoLevelChoice, VerificationCode,
};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::signup::Screen;

/// Inputs validation depends on besides the submission itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    pub now: Timestamp,
    pub minimum_age: u32,
}

impl ValidationContext {
    pub fn new(now: Timestamp, minimum_age: u32) -> Self {
        Self {
            today: now.date(),
            now,
            minimum_age,
        }
    }
}

/// Local input of a data-collecting screen.
///
/// The photo screen is driven by `PhotoUploadSession` instead, and the
/// hand-off screen collects nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenSubmission {
    NameEntry {
        first_name: String,
        last_name: String,
    },
    EmailVerify {
        email: String,
        code: String,
    },
    DateOfBirth(DateOfBirthInput),
    Gender(TwoLevelChoice<GenderDetail>),
    Sexuality(Option<Sexuality>),
    SexualityPreference(Vec<InterestedIn>),
    /// Every height currently selected on the picker.
    Height(Vec<u16>),
    DatingIntention(TwoLevelChoice<DatingIntentionDetail>),
    Children(Option<Children>),
    FamilyPlans(Option<FamilyPlans>),
    Education(Option<Education>),
    Religion(Option<Religion>),
    Ethnicity(Vec<Ethnicity>),
    Drinking(Option<Habit>),
    Smoking(Option<Habit>),
    Politics(Option<Politics>),
    Drugs(Option<Habit>),
    Location {
        latitude: f64,
        longitude: f64,
        locality: Option<String>,
    },
    Review,
}

impl ScreenSubmission {
    /// The screen this input belongs to.
    pub fn screen(&self) -> Screen {
        match self {
            ScreenSubmission::NameEntry { .. } => Screen::NameEntry,
            ScreenSubmission::EmailVerify { .. } => Screen::EmailVerify,
            ScreenSubmission::DateOfBirth(_) => Screen::DateOfBirth,
            ScreenSubmission::Gender(_) => Screen::Gender,
            ScreenSubmission::Sexuality(_) => Screen::Sexuality,
            ScreenSubmission::SexualityPreference(_) => Screen::SexualityPreference,
            ScreenSubmission::Height(_) => Screen::Height,
            ScreenSubmission::DatingIntention(_) => Screen::DatingIntention,
            ScreenSubmission::Children(_) => Screen::Children,
            ScreenSubmission::FamilyPlans(_) => Screen::FamilyPlans,
            ScreenSubmission::Education(_) => Screen::Education,
            ScreenSubmission::Religion(_) => Screen::Religion,
            ScreenSubmission::Ethnicity(_) => Screen::Ethnicity,
            ScreenSubmission::Drinking(_) => Screen::Drinking,
            ScreenSubmission::Smoking(_) => Screen::Smoking,
            ScreenSubmission::Politics(_) => Screen::Politics,
            ScreenSubmission::Drugs(_) => Screen::Drugs,
            ScreenSubmission::Location { .. } => Screen::Location,
            ScreenSubmission::Review => Screen::Review,
        }
    }

    /// Validates the input and builds the single update the screen sends.
    pub fn validate(&self, ctx: &ValidationContext) -> Result<ProfileUpdate, ValidationError> {
        let progress = self.screen().completion_progress().ok_or_else(|| {
            ValidationError::invalid_format("screen", "the final screen takes no input")
        })?;

        let update = match self {
            ScreenSubmission::NameEntry {
                first_name,
                last_name,
            } => {
                let name = PersonName::new(first_name, last_name)?;
                ProfileUpdate::new()
                    .set(ProfileField::FirstName, name.first())?
                    .set(ProfileField::LastName, name.last())?
            }
            ScreenSubmission::EmailVerify { email, code } => {
                let email = EmailAddress::parse(email)?;
                VerificationCode::parse(code)?;
                ProfileUpdate::new().set(ProfileField::Email, email.as_str())?
            }
            ScreenSubmission::DateOfBirth(input) => {
                let dob = DateOfBirth::parse(input, ctx.today, ctx.minimum_age)?;
                ProfileUpdate::new().set(ProfileField::DateOfBirth, &dob)?
            }
            ScreenSubmission::Gender(choice) => {
                let (gender, detail) = choice.finalize("gender")?;
                ProfileUpdate::new()
                    .set(ProfileField::Gender, &gender)?
                    .set(ProfileField::GenderDetail, &detail)?
            }
            ScreenSubmission::Sexuality(selected) => ProfileUpdate::new()
                .set(ProfileField::Sexuality, &require_choice("sexuality", *selected)?)?,
            ScreenSubmission::SexualityPreference(selected) => {
                let genders = require_choices("interested_in", selected, None)?;
                ProfileUpdate::new().set(ProfileField::InterestedIn, &genders)?
            }
            ScreenSubmission::Height(selected) => {
                let height = Height::from_selection(selected)?;
                ProfileUpdate::new().set(ProfileField::HeightInches, &height)?
            }
            ScreenSubmission::DatingIntention(choice) => {
                let (intention, detail) = choice.finalize("dating_intention")?;
                ProfileUpdate::new()
                    .set(ProfileField::DatingIntention, &intention)?
                    .set(ProfileField::DatingIntentionDetail, &detail)?
            }
            ScreenSubmission::Children(selected) => ProfileUpdate::new()
                .set(ProfileField::Children, &require_choice("children", *selected)?)?,
            ScreenSubmission::FamilyPlans(selected) => ProfileUpdate::new().set(
                ProfileField::FamilyPlans,
                &require_choice("family_plans", *selected)?,
            )?,
            ScreenSubmission::Education(selected) => ProfileUpdate::new()
                .set(ProfileField::Education, &require_choice("education", *selected)?)?,
            ScreenSubmission::Religion(selected) => ProfileUpdate::new()
                .set(ProfileField::Religion, &require_choice("religion", *selected)?)?,
            ScreenSubmission::Ethnicity(selected) => {
                let ethnicities =
                    require_choices("ethnicities", selected, Some(Ethnicity::PreferNotToSay))?;
                ProfileUpdate::new().set(ProfileField::Ethnicities, &ethnicities)?
            }
            ScreenSubmission::Drinking(selected) => ProfileUpdate::new()
                .set(ProfileField::Drinking, &require_choice("drinking", *selected)?)?,
            ScreenSubmission::Smoking(selected) => ProfileUpdate::new()
                .set(ProfileField::Smoking, &require_choice("smoking", *selected)?)?,
            ScreenSubmission::Politics(selected) => ProfileUpdate::new()
                .set(ProfileField::Politics, &require_choice("politics", *selected)?)?,
            ScreenSubmission::Drugs(selected) => ProfileUpdate::new()
                .set(ProfileField::Drugs, &require_choice("drugs", *selected)?)?,
            ScreenSubmission::Location {
                latitude,
                longitude,
                locality,
            } => {
                let location = Location::new(*latitude, *longitude, locality.clone())?;
                ProfileUpdate::new().set(ProfileField::Location, &location)?
            }
            ScreenSubmission::Review => {
                ProfileUpdate::new().set(ProfileField::OnboardedAt, &ctx.now)?
            }
        };

        Ok(update.with_progress(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{DatingIntention, Gender};
    use crate::domain::signup::SignupProgress;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> ValidationContext {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        ValidationContext::new(Timestamp::from_datetime(now), 18)
    }

    // ───────────────────────────────────────────────────────────────
    // Field and progress mapping
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn name_entry_writes_trimmed_names_and_advances() {
        let update = ScreenSubmission::NameEntry {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
        }
        .validate(&ctx())
        .unwrap();

        assert_eq!(update.get(ProfileField::FirstName), Some(&json!("Ada")));
        assert_eq!(update.get(ProfileField::LastName), Some(&json!("Lovelace")));
        assert_eq!(update.progress(), Some(SignupProgress::NameEntered));
    }

    #[test]
    fn every_submission_advances_to_its_screens_completion() {
        let mut gender = TwoLevelChoice::<GenderDetail>::new();
        gender.select_category(Gender::Man);
        let mut intention = TwoLevelChoice::<DatingIntentionDetail>::new();
        intention.select_category(DatingIntention::FiguringOut);

        let submissions = vec![
            ScreenSubmission::DateOfBirth(DateOfBirthInput::new("07", "03", "1995")),
            ScreenSubmission::Gender(gender),
            ScreenSubmission::Sexuality(Some(Sexuality::Queer)),
            ScreenSubmission::SexualityPreference(vec![InterestedIn::Women]),
            ScreenSubmission::Height(vec![70]),
            ScreenSubmission::DatingIntention(intention),
            ScreenSubmission::Children(Some(Children::DontHave)),
            ScreenSubmission::FamilyPlans(Some(FamilyPlans::NotSure)),
            ScreenSubmission::Education(Some(Education::Postgrad)),
            ScreenSubmission::Religion(Some(Religion::Agnostic)),
            ScreenSubmission::Ethnicity(vec![Ethnicity::Other]),
            ScreenSubmission::Drinking(Some(Habit::Sometimes)),
            ScreenSubmission::Smoking(Some(Habit::No)),
            ScreenSubmission::Politics(Some(Politics::Moderate)),
            ScreenSubmission::Drugs(Some(Habit::No)),
            ScreenSubmission::Location {
                latitude: 51.5,
                longitude: -0.12,
                locality: None,
            },
            ScreenSubmission::Review,
        ];

        for submission in submissions {
            let screen = submission.screen();
            let update = submission.validate(&ctx()).unwrap();
            assert_eq!(update.progress(), screen.completion_progress(), "{:?}", screen);
        }
    }

    #[test]
    fn ethnicity_is_followed_by_drinking() {
        let update = ScreenSubmission::Ethnicity(vec![Ethnicity::SouthAsian])
            .validate(&ctx())
            .unwrap();
        assert_eq!(update.progress(), Some(SignupProgress::EthnicityComplete));
        assert_eq!(
            Screen::for_progress(SignupProgress::EthnicityComplete),
            Screen::Drinking
        );
    }

    #[test]
    fn gender_without_detail_clears_detail_field() {
        let mut choice = TwoLevelChoice::<GenderDetail>::new();
        choice.select_category(Gender::Woman);
        let update = ScreenSubmission::Gender(choice).validate(&ctx()).unwrap();
        assert_eq!(update.get(ProfileField::Gender), Some(&json!("woman")));
        assert_eq!(update.get(ProfileField::GenderDetail), Some(&json!(null)));
    }

    #[test]
    fn date_of_birth_is_written_as_iso_date() {
        let update = ScreenSubmission::DateOfBirth(DateOfBirthInput::new("7", "3", "1995"))
            .validate(&ctx())
            .unwrap();
        assert_eq!(update.get(ProfileField::DateOfBirth), Some(&json!("1995-03-07")));
    }

    // ───────────────────────────────────────────────────────────────
    // Rejections
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn invalid_calendar_date_is_rejected() {
        let result = ScreenSubmission::DateOfBirth(DateOfBirthInput::new("31", "02", "1990"))
            .validate(&ctx());
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn email_requires_six_digit_code() {
        let result = ScreenSubmission::EmailVerify {
            email: "ada@example.com".into(),
            code: "12345".into(),
        }
        .validate(&ctx());
        assert!(result.is_err());
    }

    #[test]
    fn two_heights_are_rejected() {
        assert!(ScreenSubmission::Height(vec![60, 61]).validate(&ctx()).is_err());
    }

    #[test]
    fn missing_single_choice_is_rejected() {
        assert_eq!(
            ScreenSubmission::Drugs(None).validate(&ctx()).unwrap_err(),
            ValidationError::nothing_selected("drugs")
        );
    }
}
