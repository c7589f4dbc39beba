//! Single- and multi-choice answers collected by the preference screens.
//!
//! - **`choice_enum!`** - Generates a closed answer set with `all()`, `label()`,
//!   `Display` and snake_case serde

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Declares an answer enum together with its display labels.
///
/// # Example
///
/// ```ignore
/// choice_enum! {
///     /// Whether the user has children.
///     Children {
///         DontHave => "Don't have children",
///         Have => "Have children",
///     }
/// }
/// ```
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Returns every answer in display order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            /// Returns the text shown next to the answer.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}

pub(crate) use choice_enum;

choice_enum! {
    /// Sexual orientation.
    Sexuality {
        Straight => "Straight",
        Gay => "Gay",
        Lesbian => "Lesbian",
        Bisexual => "Bisexual",
        Asexual => "Asexual",
        Demisexual => "Demisexual",
        Pansexual => "Pansexual",
        Queer => "Queer",
        Questioning => "Questioning",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    /// Who the user wants to be shown.
    InterestedIn {
        Men => "Men",
        Women => "Women",
        NonbinaryPeople => "Nonbinary people",
    }
}

choice_enum! {
    Children {
        DontHave => "Don't have children",
        Have => "Have children",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    FamilyPlans {
        DontWant => "Don't want children",
        Want => "Want children",
        OpenTo => "Open to children",
        NotSure => "Not sure yet",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    /// Highest level of education attained.
    Education {
        HighSchool => "High school",
        Undergrad => "Undergrad",
        Postgrad => "Postgrad",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    Religion {
        Agnostic => "Agnostic",
        Atheist => "Atheist",
        Buddhist => "Buddhist",
        Catholic => "Catholic",
        Christian => "Christian",
        Hindu => "Hindu",
        Jewish => "Jewish",
        Muslim => "Muslim",
        Sikh => "Sikh",
        Spiritual => "Spiritual",
        Other => "Other",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    Ethnicity {
        BlackAfricanDescent => "Black/African Descent",
        EastAsian => "East Asian",
        HispanicLatino => "Hispanic/Latino",
        MiddleEastern => "Middle Eastern",
        NativeAmerican => "Native American",
        PacificIslander => "Pacific Islander",
        SouthAsian => "South Asian",
        SoutheastAsian => "Southeast Asian",
        WhiteCaucasian => "White/Caucasian",
        Other => "Other",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    /// Answer to the drinking, smoking and drugs screens.
    Habit {
        Yes => "Yes",
        Sometimes => "Sometimes",
        No => "No",
        PreferNotToSay => "Prefer not to say",
    }
}

choice_enum! {
    Politics {
        Liberal => "Liberal",
        Moderate => "Moderate",
        Conservative => "Conservative",
        NotPolitical => "Not political",
        Other => "Other",
        PreferNotToSay => "Prefer not to say",
    }
}

/// Validates a single-choice screen: something must be picked.
pub fn require_choice<T: Copy>(field: &str, selected: Option<T>) -> Result<T, ValidationError> {
    selected.ok_or_else(|| ValidationError::nothing_selected(field))
}

/// Validates a multi-choice screen: at least one answer, duplicates removed
/// (first occurrence wins), and an opt-out answer cannot be combined with
/// anything else.
pub fn require_choices<T: Copy + PartialEq>(
    field: &str,
    selected: &[T],
    opt_out: Option<T>,
) -> Result<Vec<T>, ValidationError> {
    let mut unique: Vec<T> = Vec::with_capacity(selected.len());
    for choice in selected {
        if !unique.contains(choice) {
            unique.push(*choice);
        }
    }
    if unique.is_empty() {
        return Err(ValidationError::nothing_selected(field));
    }
    if let Some(opt_out) = opt_out {
        if unique.len() > 1 && unique.contains(&opt_out) {
            return Err(ValidationError::invalid_format(
                field,
                "'Prefer not to say' cannot be combined with other answers",
            ));
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_display_agree() {
        assert_eq!(Habit::Sometimes.label(), "Sometimes");
        assert_eq!(Politics::NotPolitical.to_string(), "Not political");
    }

    #[test]
    fn answers_serialize_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&FamilyPlans::NotSure).unwrap(),
            "\"not_sure\""
        );
        assert_eq!(
            serde_json::to_string(&Ethnicity::BlackAfricanDescent).unwrap(),
            "\"black_african_descent\""
        );
    }

    #[test]
    fn all_lists_every_answer() {
        assert_eq!(Habit::all().len(), 4);
        assert_eq!(InterestedIn::all()[0], InterestedIn::Men);
    }

    #[test]
    fn missing_single_choice_is_rejected() {
        assert_eq!(
            require_choice::<Religion>("religion", None).unwrap_err(),
            ValidationError::nothing_selected("religion")
        );
        assert_eq!(
            require_choice("religion", Some(Religion::Sikh)).unwrap(),
            Religion::Sikh
        );
    }

    #[test]
    fn multi_choice_deduplicates_in_order() {
        let picked = require_choices(
            "ethnicities",
            &[Ethnicity::SouthAsian, Ethnicity::EastAsian, Ethnicity::SouthAsian],
            Some(Ethnicity::PreferNotToSay),
        )
        .unwrap();
        assert_eq!(picked, vec![Ethnicity::SouthAsian, Ethnicity::EastAsian]);
    }

    #[test]
    fn multi_choice_requires_one_answer() {
        assert!(require_choices::<InterestedIn>("interested_in", &[], None).is_err());
    }

    #[test]
    fn opt_out_cannot_be_combined() {
        let err = require_choices(
            "ethnicities",
            &[Ethnicity::Other, Ethnicity::PreferNotToSay],
            Some(Ethnicity::PreferNotToSay),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
