//! # Registration Form
//!
//! The single record a wizard collects, and the typed setter used to edit it.
//!
//! Fields are edited through [`FieldUpdate`], a tagged union with one variant
//! per settable field. Event selection is not a `FieldUpdate`: it goes through
//! `RegistrationWizard::toggle_event` so the catalog can vet every id.

use crate::primitives::DEFAULT_TEAM_SIZE;
use crate::{EventId, Field, Year};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// REGISTRATION FORM
// =============================================================================

/// Everything a registrant enters across the three steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    // Step 1
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub year: Option<Year>,
    pub department: String,

    // Step 2
    pub selected_events: BTreeSet<EventId>,
    pub team_name: String,
    pub team_size: u8,

    // Step 3
    pub experience: String,
    pub expectations: String,
    pub dietary_restrictions: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            college: String::new(),
            year: None,
            department: String::new(),
            selected_events: BTreeSet::new(),
            team_name: String::new(),
            team_size: DEFAULT_TEAM_SIZE,
            experience: String::new(),
            expectations: String::new(),
            dietary_restrictions: String::new(),
        }
    }
}

impl RegistrationForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single field edit. The last write wins.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::FirstName(v) => self.first_name = v,
            FieldUpdate::LastName(v) => self.last_name = v,
            FieldUpdate::Email(v) => self.email = v,
            FieldUpdate::Phone(v) => self.phone = v,
            FieldUpdate::College(v) => self.college = v,
            FieldUpdate::Year(v) => self.year = v,
            FieldUpdate::Department(v) => self.department = v,
            FieldUpdate::TeamName(v) => self.team_name = v,
            FieldUpdate::TeamSize(v) => self.team_size = v,
            FieldUpdate::Experience(v) => self.experience = v,
            FieldUpdate::Expectations(v) => self.expectations = v,
            FieldUpdate::DietaryRestrictions(v) => self.dietary_restrictions = v,
        }
    }

    /// Flip membership of `id` in the selection. Returns true if now selected.
    ///
    /// Does not consult the catalog; the wizard does that before calling.
    pub fn toggle_event(&mut self, id: &EventId) -> bool {
        if self.selected_events.remove(id) {
            false
        } else {
            self.selected_events.insert(id.clone());
            true
        }
    }

    /// Check whether a text field holds something other than whitespace.
    ///
    /// `Year` counts as filled once chosen, `SelectedEvents` once non-empty,
    /// and `TeamSize` always.
    #[must_use]
    pub fn is_filled(&self, field: Field) -> bool {
        let text = match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::College => &self.college,
            Field::Department => &self.department,
            Field::TeamName => &self.team_name,
            Field::Experience => &self.experience,
            Field::Expectations => &self.expectations,
            Field::DietaryRestrictions => &self.dietary_restrictions,
            Field::Year => return self.year.is_some(),
            Field::SelectedEvents => return !self.selected_events.is_empty(),
            Field::TeamSize => return true,
        };
        !text.trim().is_empty()
    }

    /// Confirmation details shown after a successful submission.
    #[must_use]
    pub fn summary(&self) -> RegistrationSummary {
        RegistrationSummary {
            full_name: format!("{} {}", self.first_name.trim(), self.last_name.trim())
                .trim()
                .to_string(),
            email: self.email.trim().to_string(),
            event_count: self.selected_events.len(),
            college: self.college.trim().to_string(),
        }
    }
}

// =============================================================================
// FIELD UPDATE
// =============================================================================

/// A typed edit to one form field.
///
/// Serialized as `{"field": "first_name", "value": "Ada"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    College(String),
    Year(Option<Year>),
    Department(String),
    TeamName(String),
    TeamSize(u8),
    Experience(String),
    Expectations(String),
    DietaryRestrictions(String),
}

impl FieldUpdate {
    /// The field this update writes.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::FirstName(_) => Field::FirstName,
            Self::LastName(_) => Field::LastName,
            Self::Email(_) => Field::Email,
            Self::Phone(_) => Field::Phone,
            Self::College(_) => Field::College,
            Self::Year(_) => Field::Year,
            Self::Department(_) => Field::Department,
            Self::TeamName(_) => Field::TeamName,
            Self::TeamSize(_) => Field::TeamSize,
            Self::Experience(_) => Field::Experience,
            Self::Expectations(_) => Field::Expectations,
            Self::DietaryRestrictions(_) => Field::DietaryRestrictions,
        }
    }

    /// The text payload, for fields that carry one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::FirstName(v)
            | Self::LastName(v)
            | Self::Email(v)
            | Self::Phone(v)
            | Self::College(v)
            | Self::Department(v)
            | Self::TeamName(v)
            | Self::Experience(v)
            | Self::Expectations(v)
            | Self::DietaryRestrictions(v) => Some(v),
            Self::Year(_) | Self::TeamSize(_) => None,
        }
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Short confirmation view of a submitted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub full_name: String,
    pub email: String,
    pub event_count: usize,
    pub college: String,
}

// =============================================================================
// TESTS
// =============================================================================
