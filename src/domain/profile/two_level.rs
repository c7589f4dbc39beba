//! Two-level choices: a broad category with an optional refining answer.
//!
//! The selection lives entirely on the client until the screen's continue
//! action; nothing here touches the document store.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::choices::choice_enum;
use crate::domain::foundation::ValidationError;

/// A refining answer that belongs to exactly one category.
pub trait Refinement: Copy + PartialEq + fmt::Debug {
    type Category: Copy + PartialEq + fmt::Debug;

    fn category(&self) -> Self::Category;
}

/// Client-side state of a two-level picker.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLevelChoice<D: Refinement> {
    category: Option<D::Category>,
    detail: Option<D>,
}

impl<D: Refinement> TwoLevelChoice<D> {
    pub fn new() -> Self {
        Self {
            category: None,
            detail: None,
        }
    }

    /// Picks a category. A refinement from another category is dropped.
    pub fn select_category(&mut self, category: D::Category) {
        self.category = Some(category);
        if self.detail.map(|d| d.category()) != Some(category) {
            self.detail = None;
        }
    }

    /// Picks a refinement, switching to its category.
    pub fn select_detail(&mut self, detail: D) {
        self.category = Some(detail.category());
        self.detail = Some(detail);
    }

    pub fn clear_detail(&mut self) {
        self.detail = None;
    }

    pub fn category(&self) -> Option<D::Category> {
        self.category
    }

    pub fn detail(&self) -> Option<D> {
        self.detail
    }

    /// Returns the final answer when the user presses continue.
    pub fn finalize(&self, field: &str) -> Result<(D::Category, Option<D>), ValidationError> {
        let category = self
            .category
            .ok_or_else(|| ValidationError::nothing_selected(field))?;
        if let Some(detail) = self.detail {
            if detail.category() != category {
                return Err(ValidationError::invalid_format(
                    field,
                    "refinement does not belong to the selected category",
                ));
            }
        }
        Ok((category, self.detail))
    }
}

impl<D: Refinement> Default for TwoLevelChoice<D> {
    fn default() -> Self {
        Self::new()
    }
}

choice_enum! {
    Gender {
        Man => "Man",
        Woman => "Woman",
        Nonbinary => "Nonbinary",
    }
}

choice_enum! {
    /// Optional, more specific gender identity.
    GenderDetail {
        CisMan => "Cis man",
        IntersexMan => "Intersex man",
        TransMan => "Trans man",
        TransmasculinePerson => "Transmasculine",
        CisWoman => "Cis woman",
        IntersexWoman => "Intersex woman",
        TransWoman => "Trans woman",
        TransfemininePerson => "Transfeminine",
        Agender => "Agender",
        Genderfluid => "Genderfluid",
        Genderqueer => "Genderqueer",
        TwoSpirit => "Two-Spirit",
    }
}

impl Refinement for GenderDetail {
    type Category = Gender;

    fn category(&self) -> Gender {
        use GenderDetail::*;
        match self {
            CisMan | IntersexMan | TransMan | TransmasculinePerson => Gender::Man,
            CisWoman | IntersexWoman | TransWoman | TransfemininePerson => Gender::Woman,
            Agender | Genderfluid | Genderqueer | TwoSpirit => Gender::Nonbinary,
        }
    }
}

choice_enum! {
    DatingIntention {
        LongTerm => "Long-term",
        ShortTerm => "Short-term",
        FiguringOut => "Figuring out my dating goals",
    }
}

choice_enum! {
    DatingIntentionDetail {
        LifePartner => "Life partner",
        LongTermRelationship => "Long-term relationship",
        LongTermOpenToShort => "Long-term, open to short",
        ShortTermOpenToLong => "Short-term, open to long",
        ShortTermFun => "Short-term fun",
    }
}

impl Refinement for DatingIntentionDetail {
    type Category = DatingIntention;

    fn category(&self) -> DatingIntention {
        use DatingIntentionDetail::*;
        match self {
            LifePartner | LongTermRelationship | LongTermOpenToShort => DatingIntention::LongTerm,
            ShortTermOpenToLong | ShortTermFun => DatingIntention::ShortTerm,
        }
    }
}
