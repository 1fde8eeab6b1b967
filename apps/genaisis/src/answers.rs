//! # Answer Sheets
//!
//! A registration written down ahead of time, replayed through a wizard by the
//! `check` and `register` commands.
//!
//! Sheets are TOML or JSON, chosen by file extension:
//!
//! ```toml
//! first_name = "Ada"
//! last_name = "Lovelace"
//! email = "ada@example.com"
//! phone = "+911234567890"
//! college = "SJCE"
//! year = "2"
//! department = "CSE"
//! events = ["binary-brawl"]
//! ```

use crate::error::AppError;
use genaisis_core::{
    EventCatalog, EventId, Field, FieldUpdate, RegistrationWizard, Step, WizardConfig, Year,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Answer sheets are small; refuse anything bigger (256 KB).
const MAX_ANSWER_FILE_SIZE: u64 = 256 * 1024;

// =============================================================================
// ANSWER SHEET
// =============================================================================

/// The answers a registrant would type into the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnswerSheet {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub year: Option<Year>,
    pub department: Option<String>,
    pub events: Vec<EventId>,
    pub team_name: Option<String>,
    pub team_size: Option<u8>,
    pub experience: Option<String>,
    pub expectations: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl AnswerSheet {
    /// Read a sheet; `.json` files are JSON, everything else TOML.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(AppError::Io(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > MAX_ANSWER_FILE_SIZE {
            return Err(AppError::Answers(format!(
                "'{}' is {} bytes, maximum is {}",
                path.display(),
                metadata.len(),
                MAX_ANSWER_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Answers(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::Answers(e.to_string()))
    }

    /// The field edits this sheet makes, in form order.
    #[must_use]
    pub fn updates(&self) -> Vec<FieldUpdate> {
        let mut updates = Vec::new();
        let mut text = |value: &Option<String>, make: fn(String) -> FieldUpdate| {
            if let Some(value) = value {
                updates.push(make(value.clone()));
            }
        };
        text(&self.first_name, FieldUpdate::FirstName);
        text(&self.last_name, FieldUpdate::LastName);
        text(&self.email, FieldUpdate::Email);
        text(&self.phone, FieldUpdate::Phone);
        text(&self.college, FieldUpdate::College);
        text(&self.department, FieldUpdate::Department);
        text(&self.team_name, FieldUpdate::TeamName);
        text(&self.experience, FieldUpdate::Experience);
        text(&self.expectations, FieldUpdate::Expectations);
        text(&self.dietary_restrictions, FieldUpdate::DietaryRestrictions);

        if let Some(year) = self.year {
            updates.push(FieldUpdate::Year(Some(year)));
        }
        if let Some(size) = self.team_size {
            updates.push(FieldUpdate::TeamSize(size));
        }
        updates
    }

    /// Fill `wizard` from this sheet and walk it to the final step.
    ///
    /// Stops at the first rejection: an unknown event or an incomplete step.
    pub fn replay(&self, wizard: &mut RegistrationWizard) -> Result<(), AppError> {
        wizard.set_fields(self.updates())?;
        for id in &self.events {
            if !wizard.form().selected_events.contains(id) {
                wizard.toggle_event(id)?;
            }
        }
        while wizard.current_step() != Step::LAST {
            wizard.next()?;
        }
        Ok(())
    }

    /// Report everything that would stop this sheet from being submitted.
    #[must_use]
    pub fn check(&self, catalog: Arc<EventCatalog>, config: WizardConfig) -> CheckReport {
        let mut wizard = RegistrationWizard::with_config(catalog, config);
        let mut unknown_events = Vec::new();

        // A fresh wizard is editable, so only unknown events can be rejected.
        if wizard.set_fields(self.updates()).is_ok() {
            for id in &self.events {
                if wizard.form().selected_events.contains(id) {
                    continue;
                }
                if wizard.toggle_event(id).is_err() {
                    unknown_events.push(id.clone());
                }
            }
        }

        let steps = Step::ALL
            .into_iter()
            .map(|step| StepReport {
                step,
                title: step.title().to_string(),
                missing: wizard.missing_fields(step),
            })
            .collect();

        CheckReport {
            steps,
            unknown_events,
        }
    }
}

// =============================================================================
// CHECK REPORT
// =============================================================================

/// Missing fields of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub title: String,
    pub missing: Vec<Field>,
}

/// Result of checking an answer sheet without submitting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub steps: Vec<StepReport>,
    pub unknown_events: Vec<EventId>,
}

impl CheckReport {
    /// True when the sheet would pass every step.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unknown_events.is_empty() && self.steps.iter().all(|s| s.missing.is_empty())
    }
}

// =============================================================================
// TESTS
// =============================================================================
