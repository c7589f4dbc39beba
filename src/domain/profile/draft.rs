//! The user's document as stored remotely, and partial updates to it.
//!
//! Each screen owns a disjoint set of fields and writes them with merge
//! semantics; the document as a whole has no cross-field transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::{
    Children, DatingIntention, DatingIntentionDetail, Education, Ethnicity, FamilyPlans, Gender,
    GenderDetail, Habit, InterestedIn, Location, PhotoLocator, Politics, Religion, Sexuality,
};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::signup::SignupProgress;

/// Raw document keyed by field name.
pub type UserDocument = Map<String, Value>;

/// Document key holding the progress identifier.
pub const PROGRESS_KEY: &str = "progress";

/// Document key written once when the record is created.
pub const CREATED_AT_KEY: &str = "createdAt";

/// A profile field owned by one onboarding screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    DateOfBirth,
    Gender,
    GenderDetail,
    Sexuality,
    InterestedIn,
    HeightInches,
    DatingIntention,
    DatingIntentionDetail,
    Children,
    FamilyPlans,
    Education,
    Religion,
    Ethnicities,
    Drinking,
    Smoking,
    Politics,
    Drugs,
    Location,
    Photos,
    OnboardedAt,
}

impl ProfileField {
    /// Returns the document key.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "firstName",
            ProfileField::LastName => "lastName",
            ProfileField::Email => "email",
            ProfileField::DateOfBirth => "dateOfBirth",
            ProfileField::Gender => "gender",
            ProfileField::GenderDetail => "genderDetail",
            ProfileField::Sexuality => "sexuality",
            ProfileField::InterestedIn => "interestedIn",
            ProfileField::HeightInches => "heightInches",
            ProfileField::DatingIntention => "datingIntention",
            ProfileField::DatingIntentionDetail => "datingIntentionDetail",
            ProfileField::Children => "children",
            ProfileField::FamilyPlans => "familyPlans",
            ProfileField::Education => "education",
            ProfileField::Religion => "religion",
            ProfileField::Ethnicities => "ethnicities",
            ProfileField::Drinking => "drinking",
            ProfileField::Smoking => "smoking",
            ProfileField::Politics => "politics",
            ProfileField::Drugs => "drugs",
            ProfileField::Location => "location",
            ProfileField::Photos => "photos",
            ProfileField::OnboardedAt => "onboardedAt",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A merge update: some fields plus, usually, the new progress value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    fields: BTreeMap<ProfileField, Value>,
    progress: Option<SignupProgress>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. `None` values are written as null, clearing the field.
    pub fn set<T: Serialize + ?Sized>(
        mut self,
        field: ProfileField,
        value: &T,
    ) -> Result<Self, ValidationError> {
        let value = serde_json::to_value(value)
            .map_err(|e| ValidationError::invalid_format(field.key(), e.to_string()))?;
        self.fields.insert(field, value);
        Ok(self)
    }

    /// Attaches the progress value written together with the fields.
    pub fn with_progress(mut self, progress: SignupProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn progress(&self) -> Option<SignupProgress> {
        self.progress
    }

    pub fn get(&self, field: ProfileField) -> Option<&Value> {
        self.fields.get(&field)
    }

    /// The stored milestone this update would move backward from, if any.
    ///
    /// Rewriting the stored milestone is allowed, so a retried save is
    /// harmless.
    pub fn regresses_from(&self, document: &UserDocument) -> Option<SignupProgress> {
        let next = self.progress?;
        let stored = stored_progress(document);
        (next.rank() < stored.rank()).then_some(stored)
    }

    pub fn fields(&self) -> impl Iterator<Item = (ProfileField, &Value)> {
        self.fields.iter().map(|(f, v)| (*f, v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.progress.is_none()
    }

    /// Converts to the key/value patch merged into the stored document.
    pub fn into_patch(self) -> UserDocument {
        let mut patch: UserDocument = self
            .fields
            .into_iter()
            .map(|(field, value)| (field.key().to_string(), value))
            .collect();
        if let Some(progress) = self.progress {
            patch.insert(
                PROGRESS_KEY.to_string(),
                Value::String(progress.as_str().to_string()),
            );
        }
        patch
    }
}

/// Progress recorded in a stored document; missing or unknown means `Initial`.
pub fn stored_progress(document: &UserDocument) -> SignupProgress {
    document
        .get(PROGRESS_KEY)
        .and_then(Value::as_str)
        .map(SignupProgress::from_persisted)
        .unwrap_or_default()
}

/// Merges `patch` into `target`: nested objects merge key by key, any other
/// value (arrays included) overwrites.
pub fn merge_document(target: &mut UserDocument, patch: UserDocument) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_document(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Typed read view of the accumulated profile.
///
/// Every field is optional: the document fills in one screen at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDraftProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub gender_detail: Option<GenderDetail>,
    pub sexuality: Option<Sexuality>,
    pub interested_in: Vec<InterestedIn>,
    pub height_inches: Option<u16>,
    pub dating_intention: Option<DatingIntention>,
    pub dating_intention_detail: Option<DatingIntentionDetail>,
    pub children: Option<Children>,
    pub family_plans: Option<FamilyPlans>,
    pub education: Option<Education>,
    pub religion: Option<Religion>,
    pub ethnicities: Vec<Ethnicity>,
    pub drinking: Option<Habit>,
    pub smoking: Option<Habit>,
    pub politics: Option<Politics>,
    pub drugs: Option<Habit>,
    pub location: Option<Location>,
    pub photos: Vec<PhotoLocator>,
    pub onboarded_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    /// Raw identifier; decoded leniently by [`UserDraftProfile::progress`].
    pub progress: Option<String>,
}

impl UserDraftProfile {
    /// Decodes the stored document.
    pub fn from_document(document: &UserDocument) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document.clone()))
    }

    /// Stored progress; missing or unknown values mean `Initial`.
    pub fn progress(&self) -> SignupProgress {
        self.progress
            .as_deref()
            .map(SignupProgress::from_persisted)
            .unwrap_or_default()
    }

    /// Display name once the name screen is done.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_contains_fields_and_progress() {
        let patch = ProfileUpdate::new()
            .set(ProfileField::FirstName, "Ada")
            .unwrap()
            .set(ProfileField::HeightInches, &70u16)
            .unwrap()
            .with_progress(SignupProgress::NameEntered)
            .into_patch();

        assert_eq!(patch.get("firstName"), Some(&json!("Ada")));
        assert_eq!(patch.get("heightInches"), Some(&json!(70)));
        assert_eq!(patch.get(PROGRESS_KEY), Some(&json!("nameEntered")));
    }

    #[test]
    fn earlier_milestone_regresses_from_stored_progress() {
        let mut stored = UserDocument::new();
        stored.insert(PROGRESS_KEY.into(), json!("heightComplete"));

        let earlier = ProfileUpdate::new().with_progress(SignupProgress::NameEntered);
        let same = ProfileUpdate::new().with_progress(SignupProgress::HeightComplete);
        let fields_only = ProfileUpdate::new().set(ProfileField::FirstName, "Ada").unwrap();

        assert_eq!(earlier.regresses_from(&stored), Some(SignupProgress::HeightComplete));
        assert_eq!(same.regresses_from(&stored), None);
        assert_eq!(fields_only.regresses_from(&stored), None);
        assert_eq!(earlier.regresses_from(&UserDocument::new()), None);
    }

    #[test]
    fn none_is_written_as_null() {
        let update = ProfileUpdate::new()
            .set(ProfileField::GenderDetail, &None::<GenderDetail>)
            .unwrap();
        assert_eq!(update.get(ProfileField::GenderDetail), Some(&Value::Null));
    }

    #[test]
    fn empty_update_is_empty() {
        assert!(ProfileUpdate::new().is_empty());
        assert!(!ProfileUpdate::new()
            .with_progress(SignupProgress::Complete)
            .is_empty());
    }

    #[test]
    fn merge_keeps_untouched_keys_and_nested_values() {
        let Value::Object(mut target) = json!({
            "firstName": "Ada",
            "location": {"latitude": 1.0, "longitude": 2.0, "locality": "Leeds"},
            "photos": ["a", "b"]
        }) else {
            unreachable!()
        };
        let Value::Object(patch) = json!({
            "location": {"latitude": 3.0},
            "photos": ["c"]
        }) else {
            unreachable!()
        };

        merge_document(&mut target, patch);

        assert_eq!(target["firstName"], json!("Ada"));
        assert_eq!(
            target["location"],
            json!({"latitude": 3.0, "longitude": 2.0, "locality": "Leeds"})
        );
        assert_eq!(target["photos"], json!(["c"]));
    }

    #[test]
    fn draft_decodes_partial_document() {
        let document = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dateOfBirth": "1995-03-07",
            "gender": "woman",
            "ethnicities": ["east_asian"],
            "progress": "genderComplete",
            "somethingElse": true
        });
        let Value::Object(document) = document else {
            unreachable!()
        };

        let draft = UserDraftProfile::from_document(&document).unwrap();

        assert_eq!(draft.display_name().as_deref(), Some("Ada Lovelace"));
        assert_eq!(draft.gender, Some(Gender::Woman));
        assert_eq!(draft.ethnicities, vec![Ethnicity::EastAsian]);
        assert_eq!(draft.progress(), SignupProgress::GenderComplete);
        assert_eq!(draft.height_inches, None);
    }

    #[test]
    fn unknown_progress_in_document_means_initial() {
        let draft = UserDraftProfile {
            progress: Some("bogus".into()),
            ..Default::default()
        };
        assert_eq!(draft.progress(), SignupProgress::Initial);
        assert_eq!(UserDraftProfile::default().progress(), SignupProgress::Initial);
    }
}
