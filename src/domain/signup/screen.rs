//! Screen enum - the dispatch table of the onboarding wizard.
//!
//! Exactly one screen is bound to each progress milestone: the screen shown
//! while the user's stored progress equals that milestone.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SignupProgress;

/// Every screen of the onboarding flow, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    NameEntry,
    EmailVerify,
    DateOfBirth,
    Gender,
    Sexuality,
    SexualityPreference,
    Height,
    DatingIntention,
    Children,
    FamilyPlans,
    Education,
    Religion,
    Ethnicity,
    Drinking,
    Smoking,
    Politics,
    Drugs,
    Location,
    Photos,
    /// Shown at `photosComplete`; its single write records `onboardedAt` and
    /// the terminal `complete` milestone.
    Review,
    /// Terminal hand-off to the main application shell.
    Complete,
}

impl Screen {
    /// Returns all screens in step-index order.
    pub fn all() -> &'static [Screen] {
        use Screen::*;
        &[
            NameEntry,
            EmailVerify,
            DateOfBirth,
            Gender,
            Sexuality,
            SexualityPreference,
            Height,
            DatingIntention,
            Children,
            FamilyPlans,
            Education,
            Religion,
            Ethnicity,
            Drinking,
            Smoking,
            Politics,
            Drugs,
            Location,
            Photos,
            Review,
            Complete,
        ]
    }

    /// Returns the screen at a step index, if the index is in the table.
    pub fn at(index: usize) -> Option<Screen> {
        Self::all().get(index).copied()
    }

    /// Returns the screen shown while stored progress equals `progress`.
    pub fn for_progress(progress: SignupProgress) -> Screen {
        use SignupProgress as P;
        match progress {
            P::Initial => Screen::NameEntry,
            P::NameEntered => Screen::EmailVerify,
            P::EmailVerified => Screen::DateOfBirth,
            P::DobVerified => Screen::Gender,
            P::GenderComplete => Screen::Sexuality,
            P::SexualityComplete => Screen::SexualityPreference,
            P::SexualityPreferenceComplete => Screen::Height,
            P::HeightComplete => Screen::DatingIntention,
            P::DatingIntentionComplete => Screen::Children,
            P::ChildrenComplete => Screen::FamilyPlans,
            P::FamilyPlansComplete => Screen::Education,
            P::EducationComplete => Screen::Religion,
            P::ReligionComplete => Screen::Ethnicity,
            P::EthnicityComplete => Screen::Drinking,
            P::DrinkingComplete => Screen::Smoking,
            P::SmokingComplete => Screen::Politics,
            P::PoliticsComplete => Screen::Drugs,
            P::DrugsComplete => Screen::Location,
            P::LocationComplete => Screen::Photos,
            P::PhotosComplete => Screen::Review,
            P::Complete => Screen::Complete,
        }
    }

    /// Returns the milestone this screen is shown at.
    pub fn entry_progress(&self) -> SignupProgress {
        use SignupProgress as P;
        match self {
            Screen::NameEntry => P::Initial,
            Screen::EmailVerify => P::NameEntered,
            Screen::DateOfBirth => P::EmailVerified,
            Screen::Gender => P::DobVerified,
            Screen::Sexuality => P::GenderComplete,
            Screen::SexualityPreference => P::SexualityComplete,
            Screen::Height => P::SexualityPreferenceComplete,
            Screen::DatingIntention => P::HeightComplete,
            Screen::Children => P::DatingIntentionComplete,
            Screen::FamilyPlans => P::ChildrenComplete,
            Screen::Education => P::FamilyPlansComplete,
            Screen::Religion => P::EducationComplete,
            Screen::Ethnicity => P::ReligionComplete,
            Screen::Drinking => P::EthnicityComplete,
            Screen::Smoking => P::DrinkingComplete,
            Screen::Politics => P::SmokingComplete,
            Screen::Drugs => P::PoliticsComplete,
            Screen::Location => P::DrugsComplete,
            Screen::Photos => P::LocationComplete,
            Screen::Review => P::PhotosComplete,
            Screen::Complete => P::Complete,
        }
    }

    /// Returns the milestone written when this screen completes.
    ///
    /// `None` for the terminal hand-off, which writes nothing.
    pub fn completion_progress(&self) -> Option<SignupProgress> {
        self.entry_progress().next()
    }

    /// Returns true for the terminal hand-off screen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Screen::Complete)
    }

    /// Human readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::NameEntry => "What's your name?",
            Screen::EmailVerify => "What's your email?",
            Screen::DateOfBirth => "What's your date of birth?",
            Screen::Gender => "Which gender best describes you?",
            Screen::Sexuality => "What's your sexuality?",
            Screen::SexualityPreference => "Who would you like to date?",
            Screen::Height => "How tall are you?",
            Screen::DatingIntention => "What's your dating intention?",
            Screen::Children => "Do you have children?",
            Screen::FamilyPlans => "What are your family plans?",
            Screen::Education => "What's the highest level you attained?",
            Screen::Religion => "What are your religious beliefs?",
            Screen::Ethnicity => "What's your ethnicity?",
            Screen::Drinking => "Do you drink?",
            Screen::Smoking => "Do you smoke?",
            Screen::Politics => "What are your political beliefs?",
            Screen::Drugs => "Do you use drugs?",
            Screen::Location => "Where do you live?",
            Screen::Photos => "Pick your photos",
            Screen::Review => "You're all set",
            Screen::Complete => "Welcome",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_screen_per_milestone() {
        assert_eq!(Screen::all().len(), SignupProgress::all().len());
    }

    #[test]
    fn for_progress_and_entry_progress_are_inverse() {
        for progress in SignupProgress::all() {
            assert_eq!(Screen::for_progress(*progress).entry_progress(), *progress);
        }
        for screen in Screen::all() {
            assert_eq!(Screen::for_progress(screen.entry_progress()), *screen);
        }
    }

    #[test]
    fn table_order_matches_progress_order() {
        for (idx, screen) in Screen::all().iter().enumerate() {
            assert_eq!(screen.entry_progress().rank(), idx);
        }
    }

    #[test]
    fn at_returns_none_past_the_table() {
        assert_eq!(Screen::at(0), Some(Screen::NameEntry));
        assert_eq!(Screen::at(20), Some(Screen::Complete));
        assert_eq!(Screen::at(21), None);
    }

    #[test]
    fn completion_progress_is_the_next_milestone() {
        assert_eq!(
            Screen::Height.completion_progress(),
            Some(SignupProgress::HeightComplete)
        );
        assert_eq!(
            Screen::Photos.completion_progress(),
            Some(SignupProgress::PhotosComplete)
        );
        assert_eq!(
            Screen::Review.completion_progress(),
            Some(SignupProgress::Complete)
        );
        assert_eq!(Screen::Complete.completion_progress(), None);
    }

    #[test]
    fn ethnicity_is_followed_by_drinking_without_gaps() {
        let after = Screen::Ethnicity.completion_progress().unwrap();
        assert_eq!(Screen::for_progress(after), Screen::Drinking);
    }

    #[test]
    fn only_complete_is_terminal() {
        let terminal: Vec<_> = Screen::all().iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&Screen::Complete]);
    }
}
