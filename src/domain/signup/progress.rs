//! SignupProgress enum - the ordered onboarding milestones.
//!
//! The persisted identifier (camelCase) is what lives in the user's
//! document; the rank is derived from declaration order and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// How far a user has advanced through onboarding.
///
/// Declaration order is the total order of the flow. New milestones must be
/// appended before `Complete` only together with a one-time remap of stored
/// identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignupProgress {
    Initial,
    NameEntered,
    EmailVerified,
    DobVerified,
    GenderComplete,
    SexualityComplete,
    SexualityPreferenceComplete,
    HeightComplete,
    DatingIntentionComplete,
    ChildrenComplete,
    FamilyPlansComplete,
    EducationComplete,
    ReligionComplete,
    EthnicityComplete,
    DrinkingComplete,
    SmokingComplete,
    PoliticsComplete,
    DrugsComplete,
    LocationComplete,
    PhotosComplete,
    Complete,
}

impl SignupProgress {
    /// Returns all milestones in flow order.
    pub fn all() -> &'static [SignupProgress] {
        use SignupProgress::*;
        &[
            Initial,
            NameEntered,
            EmailVerified,
            DobVerified,
            GenderComplete,
            SexualityComplete,
            SexualityPreferenceComplete,
            HeightComplete,
            DatingIntentionComplete,
            ChildrenComplete,
            FamilyPlansComplete,
            EducationComplete,
            ReligionComplete,
            EthnicityComplete,
            DrinkingComplete,
            SmokingComplete,
            PoliticsComplete,
            DrugsComplete,
            LocationComplete,
            PhotosComplete,
            Complete,
        ]
    }

    /// Returns the 0-based rank of this milestone.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Returns the milestone at a given rank, if any.
    pub fn from_rank(rank: usize) -> Option<SignupProgress> {
        Self::all().get(rank).copied()
    }

    /// Returns the next milestone in order, if any.
    pub fn next(&self) -> Option<SignupProgress> {
        Self::from_rank(self.rank() + 1)
    }

    /// Returns true if this milestone comes before another.
    pub fn is_before(&self, other: &SignupProgress) -> bool {
        self.rank() < other.rank()
    }

    /// Returns the identifier stored in the user's document.
    pub fn as_str(&self) -> &'static str {
        use SignupProgress::*;
        match self {
            Initial => "initial",
            NameEntered => "nameEntered",
            EmailVerified => "emailVerified",
            DobVerified => "dobVerified",
            GenderComplete => "genderComplete",
            SexualityComplete => "sexualityComplete",
            SexualityPreferenceComplete => "sexualityPreferenceComplete",
            HeightComplete => "heightComplete",
            DatingIntentionComplete => "datingIntentionComplete",
            ChildrenComplete => "childrenComplete",
            FamilyPlansComplete => "familyPlansComplete",
            EducationComplete => "educationComplete",
            ReligionComplete => "religionComplete",
            EthnicityComplete => "ethnicityComplete",
            DrinkingComplete => "drinkingComplete",
            SmokingComplete => "smokingComplete",
            PoliticsComplete => "politicsComplete",
            DrugsComplete => "drugsComplete",
            LocationComplete => "locationComplete",
            PhotosComplete => "photosComplete",
            Complete => "complete",
        }
    }

    /// Decodes a stored identifier, treating anything unrecognized as
    /// `Initial` so corrupt remote state restarts the flow.
    pub fn from_persisted(identifier: &str) -> SignupProgress {
        match identifier.parse() {
            Ok(progress) => progress,
            Err(_) => {
                tracing::warn!(
                    identifier,
                    "Unrecognized signup progress in stored profile, restarting flow"
                );
                SignupProgress::Initial
            }
        }
    }
}

/// Rank of a stored progress identifier; unknown identifiers rank 0.
pub fn rank_of(identifier: &str) -> usize {
    SignupProgress::from_persisted(identifier).rank()
}

impl Default for SignupProgress {
    fn default() -> Self {
        SignupProgress::Initial
    }
}

impl fmt::Display for SignupProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SignupProgress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| {
                ValidationError::invalid_format("progress", format!("unknown milestone '{}'", s))
            })
    }
}

impl StateMachine for SignupProgress {
    /// A screen may only advance progress by exactly one milestone.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.next().into_iter().collect()
    }
}
