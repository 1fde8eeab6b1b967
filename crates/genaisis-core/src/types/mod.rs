//! # Core Type Definitions
//!
//! This module contains the small vocabulary the wizard is built from:
//! - Identifiers (`EventId`)
//! - Enumerated inputs (`Year`)
//! - Wizard position and lifecycle (`Step`, `WizardStatus`)
//! - Field identifiers used for validation reports (`Field`)
//! - Error types (`WizardError`, `SubmissionError`)
//!
//! ## Ordering Guarantees
//!
//! Every type that can end up in a collection implements `Ord`, so selections
//! and reports iterate in a stable order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// EVENT IDENTIFIER
// =============================================================================

/// Identifier of a symposium event, e.g. `binary-brawl`.
///
/// Only identifiers present in the wizard's `EventCatalog` can be selected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create a new event identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// YEAR OF STUDY
// =============================================================================

/// Year of study. Serialized as `"1"`..`"4"` or `"pg"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Year {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
    #[serde(rename = "pg")]
    PostGraduate,
}

impl Year {
    /// All selectable years, in display order.
    pub const ALL: [Self; 5] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::PostGraduate,
    ];

    /// The wire code (`"1"`, ..., `"pg"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::First => "1",
            Self::Second => "2",
            Self::Third => "3",
            Self::Fourth => "4",
            Self::PostGraduate => "pg",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
            Self::Fourth => "4th Year",
            Self::PostGraduate => "Post Graduate",
        }
    }

    /// Parse a wire code. Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|year| year.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// WIZARD STEP
// =============================================================================

/// A wizard step. Steps form a linear sequence `1 -> 2 -> 3`.
///
/// Serialized as its step number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Step 1: name, contact and affiliation.
    PersonalInfo,
    /// Step 2: event selection and team name.
    EventSelection,
    /// Step 3: optional free text, then submission.
    FinalDetails,
}

impl Step {
    /// The first step.
    pub const FIRST: Self = Self::PersonalInfo;

    /// The last step.
    pub const LAST: Self = Self::FinalDetails;

    /// All steps in order.
    pub const ALL: [Self; 3] = [Self::PersonalInfo, Self::EventSelection, Self::FinalDetails];

    /// The 1-based step number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::EventSelection => 2,
            Self::FinalDetails => 3,
        }
    }

    /// Look up a step by its 1-based number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::PersonalInfo),
            2 => Some(Self::EventSelection),
            3 => Some(Self::FinalDetails),
            _ => None,
        }
    }

    /// The following step, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => Some(Self::EventSelection),
            Self::EventSelection => Some(Self::FinalDetails),
            Self::FinalDetails => None,
        }
    }

    /// The preceding step, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => None,
            Self::EventSelection => Some(Self::PersonalInfo),
            Self::FinalDetails => Some(Self::EventSelection),
        }
    }

    /// Title shown above the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Information",
            Self::EventSelection => "Event Selection",
            Self::FinalDetails => "Final Details",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or_else(|| format!("no wizard step {}", number))
    }
}

// =============================================================================
// WIZARD STATUS
// =============================================================================

/// Lifecycle of a wizard.
///
/// `Editing -> Submitting -> Submitted`, with `Submitting -> Editing` when the
/// submission sink fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    /// Fields and steps may change.
    #[default]
    Editing,
    /// A submission is in flight; the form is frozen.
    Submitting,
    /// Terminal. The form is immutable.
    Submitted,
}

// =============================================================================
// FIELD IDENTIFIERS
// =============================================================================

/// Identifies one field of the registration form.
///
/// Used in validation reports so the caller can point at what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    College,
    Year,
    Department,
    SelectedEvents,
    TeamName,
    TeamSize,
    Experience,
    Expectations,
    DietaryRestrictions,
}

impl Field {
    /// Form label for the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::College => "College/Institution",
            Self::Year => "Year of Study",
            Self::Department => "Department",
            Self::SelectedEvents => "Events",
            Self::TeamName => "Team Name",
            Self::TeamSize => "Team Size",
            Self::Experience => "Previous AI/ML Experience",
            Self::Expectations => "Expectations",
            Self::DietaryRestrictions => "Dietary Restrictions/Special Requirements",
        }
    }

    /// The step on which the field is collected.
    #[must_use]
    pub const fn step(self) -> Step {
        match self {
            Self::FirstName
            | Self::LastName
            | Self::Email
            | Self::Phone
            | Self::College
            | Self::Year
            | Self::Department => Step::PersonalInfo,
            Self::SelectedEvents | Self::TeamName | Self::TeamSize => Step::EventSelection,
            Self::Experience | Self::Expectations | Self::DietaryRestrictions => Step::FinalDetails,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn join_labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failure reported by a submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SubmissionError {
    /// The receiver refused the registration.
    #[error("Registration rejected: {0}")]
    Rejected(String),

    /// The receiver could not be reached or is overloaded.
    #[error("Registration service unavailable: {0}")]
    Unavailable(String),

    /// No answer within the deadline.
    #[error("Registration timed out after {0} ms")]
    TimedOut(u64),

    /// Local I/O failed while recording the registration.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors returned by wizard operations.
///
/// A rejected operation never changes wizard state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The current step's guard does not hold.
    #[error("Cannot leave {step}: missing {}", join_labels(.missing))]
    StepIncomplete { step: Step, missing: Vec<Field> },

    /// `next()` on the last step.
    #[error("Already on the last step")]
    NoNextStep,

    /// `prev()` on the first step.
    #[error("Already on the first step")]
    NoPreviousStep,

    /// `submit()` anywhere but the last step.
    #[error("Submission is only possible from the final step, currently on {0}")]
    NotOnFinalStep(Step),

    /// The wizard is frozen while a submission is in flight.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The wizard reached its terminal state.
    #[error("Registration has already been submitted")]
    AlreadySubmitted,

    /// `finish_submission()` without a matching `begin_submission()`.
    #[error("No submission is in progress")]
    NoSubmissionInFlight,

    /// The event is not part of the catalog.
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    /// The catalog handed to the wizard is unusable.
    #[error("Invalid event catalog: {0}")]
    InvalidCatalog(String),

    /// The sink refused or failed; the wizard is back on the final step.
    #[error("Submission failed: {0}")]
    SubmissionFailed(#[from] SubmissionError),
}

impl WizardError {
    /// True for guard rejections (the step is incomplete).
    #[must_use]
    pub fn is_guard_rejection(&self) -> bool {
        matches!(self, Self::StepIncomplete { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_sequence_is_linear() {
        assert_eq!(Step::FIRST.prev(), None);
        assert_eq!(Step::FIRST.next(), Some(Step::EventSelection));
        assert_eq!(Step::EventSelection.next(), Some(Step::FinalDetails));
        assert_eq!(Step::LAST.next(), None);
        assert_eq!(Step::LAST.prev(), Some(Step::EventSelection));
    }

    #[test]
    fn step_numbers_round_trip() {
        for step in Step::ALL {
            assert_eq!(Step::from_number(step.number()), Some(step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(4), None);
    }

    #[test]
    fn step_serializes_as_number() {
        let json = serde_json::to_string(&Step::EventSelection).expect("serialize");
        assert_eq!(json, "2");
        let bad: Result<Step, _> = serde_json::from_str("7");
        assert!(bad.is_err());
    }

    #[test]
    fn year_codes() {
        assert_eq!(Year::from_code("2"), Some(Year::Second));
        assert_eq!(Year::from_code(" PG "), Some(Year::PostGraduate));
        assert_eq!(Year::from_code(""), None);
        assert_eq!(Year::from_code("5"), None);

        let json = serde_json::to_string(&Year::PostGraduate).expect("serialize");
        assert_eq!(json, "\"pg\"");
    }

    #[test]
    fn fields_belong_to_steps() {
        assert_eq!(Field::Department.step(), Step::PersonalInfo);
        assert_eq!(Field::TeamName.step(), Step::EventSelection);
        assert_eq!(Field::Expectations.step(), Step::FinalDetails);
    }

    #[test]
    fn guard_rejection_message_lists_fields() {
        let err = WizardError::StepIncomplete {
            step: Step::PersonalInfo,
            missing: vec![Field::FirstName, Field::Year],
        };
        assert!(err.is_guard_rejection());
        let msg = err.to_string();
        assert!(msg.contains("First Name, Year of Study"), "{msg}");
    }
}
