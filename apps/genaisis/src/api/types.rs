//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use super::registry::WizardId;
use genaisis_core::{
    Acknowledgement, EventInfo, Field, FieldUpdate, RegistrationForm, RegistrationSummary,
    RegistrationWizard, Step, SubmissionError, WizardStatus,
    primitives::{MAX_FIELD_LENGTH, MAX_FREE_TEXT_LENGTH},
};
use serde::{Deserialize, Serialize};

/// Maximum number of field updates in one `PATCH`.
pub const MAX_UPDATES_PER_REQUEST: usize = 32;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// EVENTS RESPONSE
// =============================================================================

/// Event catalog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<EventInfo>,
}

// =============================================================================
// WIZARD VIEW
// =============================================================================

/// Everything a front end needs to render a wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardView {
    pub id: WizardId,
    pub step: Step,
    pub step_title: String,
    pub status: WizardStatus,
    pub can_advance: bool,
    /// Fields blocking "Next", or "Submit" on the final step.
    pub missing_fields: Vec<Field>,
    pub team_required: bool,
    pub form: RegistrationForm,
    pub last_error: Option<SubmissionError>,
    pub receipt: Option<Acknowledgement>,
    pub summary: Option<RegistrationSummary>,
}

impl WizardView {
    #[must_use]
    pub fn new(id: WizardId, wizard: &RegistrationWizard) -> Self {
        let step = wizard.current_step();
        Self {
            id,
            step,
            step_title: step.title().to_string(),
            status: wizard.status(),
            can_advance: wizard.can_advance(),
            missing_fields: wizard.blocking_fields(),
            team_required: wizard.team_required(),
            form: wizard.form().clone(),
            last_error: wizard.last_error().cloned(),
            receipt: wizard.receipt().cloned(),
            summary: wizard.summary(),
        }
    }
}

// =============================================================================
// WIZARD RESPONSE
// =============================================================================

/// Response to every wizard endpoint.
///
/// On rejection `success` is false, `error` says why and, for guard
/// rejections, `missing_fields` lists the blocking fields. `wizard` carries
/// the (unchanged) state whenever the session exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardResponse {
    pub success: bool,
    pub wizard: Option<WizardView>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<Field>,
}

impl WizardResponse {
    pub fn success(view: WizardView) -> Self {
        Self {
            success: true,
            wizard: Some(view),
            error: None,
            missing_fields: vec![],
        }
    }

    pub fn rejected(view: WizardView, error: impl Into<String>, missing: Vec<Field>) -> Self {
        Self {
            success: false,
            wizard: Some(view),
            error: Some(error.into()),
            missing_fields: missing,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            wizard: None,
            error: Some(msg.into()),
            missing_fields: vec![],
        }
    }
}

// =============================================================================
// FIELD UPDATE LIMITS
// =============================================================================

/// Check a batch of field updates against the size limits.
///
/// Keeps oversized payloads out of wizard state; the wizard itself accepts
/// any text.
pub fn validate_updates(updates: &[FieldUpdate]) -> Result<(), String> {
    if updates.len() > MAX_UPDATES_PER_REQUEST {
        return Err(format!(
            "{} updates in one request, maximum is {}",
            updates.len(),
            MAX_UPDATES_PER_REQUEST
        ));
    }

    for update in updates {
        let Some(text) = update.text() else {
            continue;
        };
        let field = update.field();
        let limit = match field {
            Field::Experience | Field::Expectations | Field::DietaryRestrictions => {
                MAX_FREE_TEXT_LENGTH
            }
            _ => MAX_FIELD_LENGTH,
        };
        if text.len() > limit {
            return Err(format!(
                "{} is {} bytes, maximum is {}",
                field.label(),
                text.len(),
                limit
            ));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_updates_pass() {
        let updates = vec![
            FieldUpdate::FirstName("Ada".into()),
            FieldUpdate::TeamSize(3),
            FieldUpdate::Experience("x".repeat(MAX_FREE_TEXT_LENGTH)),
        ];
        assert!(validate_updates(&updates).is_ok());
    }

    #[test]
    fn long_single_line_field_fails() {
        let updates = vec![FieldUpdate::Email("x".repeat(MAX_FIELD_LENGTH + 1))];
        let err = validate_updates(&updates).expect_err("too long");
        assert!(err.contains("Email"), "{err}");
    }

    #[test]
    fn too_many_updates_fail() {
        let updates = vec![FieldUpdate::TeamSize(2); MAX_UPDATES_PER_REQUEST + 1];
        assert!(validate_updates(&updates).is_err());
    }
}
