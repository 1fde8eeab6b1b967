//! # Step Validation
//!
//! The guard predicates that gate forward movement through the wizard.
//!
//! - Step 1: every personal-information field is filled (after trim) and a
//!   year is chosen. No format checks.
//! - Step 2: at least one event is selected. With
//!   [`WizardConfig::require_team_name`] on, a team name is also needed when a
//!   selected event cannot be entered alone.
//! - Step 3: always valid.
//!
//! Instead of a bare boolean, the guard is expressed as the list of missing
//! fields; a step is valid exactly when that list is empty.

use crate::{EventCatalog, Field, RegistrationForm, Step};
use serde::{Deserialize, Serialize};

/// Fields required on step 1, in form order.
pub const PERSONAL_INFO_FIELDS: [Field; 7] = [
    Field::FirstName,
    Field::LastName,
    Field::Email,
    Field::Phone,
    Field::College,
    Field::Year,
    Field::Department,
];

/// Tunable validation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Demand a team name on step 2 when a selected event needs a team.
    pub require_team_name: bool,
}

/// Check whether any selected event needs a team.
#[must_use]
pub fn team_required(form: &RegistrationForm, catalog: &EventCatalog) -> bool {
    form.selected_events
        .iter()
        .filter_map(|id| catalog.get(id))
        .any(|event| event.requires_team())
}

/// Fields that block leaving `step`, in form order.
#[must_use]
pub fn missing_fields(
    form: &RegistrationForm,
    step: Step,
    catalog: &EventCatalog,
    config: &WizardConfig,
) -> Vec<Field> {
    match step {
        Step::PersonalInfo => PERSONAL_INFO_FIELDS
            .into_iter()
            .filter(|&field| !form.is_filled(field))
            .collect(),
        Step::EventSelection => {
            let mut missing = Vec::new();
            if !form.is_filled(Field::SelectedEvents) {
                missing.push(Field::SelectedEvents);
            }
            if config.require_team_name
                && team_required(form, catalog)
                && !form.is_filled(Field::TeamName)
            {
                missing.push(Field::TeamName);
            }
            missing
        }
        Step::FinalDetails => Vec::new(),
    }
}

/// The guard for leaving `step`.
#[must_use]
pub fn is_step_valid(
    form: &RegistrationForm,
    step: Step,
    catalog: &EventCatalog,
    config: &WizardConfig,
) -> bool {
    missing_fields(form, step, catalog, config).is_empty()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventId, FieldUpdate, Year};

    fn personal_info() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        for update in [
            FieldUpdate::FirstName("Ada".into()),
            FieldUpdate::LastName("Lovelace".into()),
            FieldUpdate::Email("ada@x.com".into()),
            FieldUpdate::Phone("+911234567890".into()),
            FieldUpdate::College("SJCE".into()),
            FieldUpdate::Year(Some(Year::Second)),
            FieldUpdate::Department("AI&ML".into()),
        ] {
            form.apply(update);
        }
        form
    }

    #[test]
    fn empty_form_misses_all_personal_fields() {
        let form = RegistrationForm::new();
        let catalog = EventCatalog::symposium();
        let missing = missing_fields(&form, Step::PersonalInfo, &catalog, &WizardConfig::default());
        assert_eq!(missing, PERSONAL_INFO_FIELDS.to_vec());
    }

    #[test]
    fn blank_first_name_blocks_step_one() {
        let mut form = personal_info();
        form.apply(FieldUpdate::FirstName("  ".into()));
        let catalog = EventCatalog::symposium();
        let config = WizardConfig::default();

        assert!(!is_step_valid(&form, Step::PersonalInfo, &catalog, &config));
        assert_eq!(
            missing_fields(&form, Step::PersonalInfo, &catalog, &config),
            vec![Field::FirstName]
        );
    }

    #[test]
    fn email_format_is_not_checked() {
        let mut form = personal_info();
        form.apply(FieldUpdate::Email("not-an-email".into()));
        let catalog = EventCatalog::symposium();
        assert!(is_step_valid(
            &form,
            Step::PersonalInfo,
            &catalog,
            &WizardConfig::default()
        ));
    }

    #[test]
    fn step_two_needs_one_event() {
        let mut form = personal_info();
        let catalog = EventCatalog::symposium();
        let config = WizardConfig::default();

        assert_eq!(
            missing_fields(&form, Step::EventSelection, &catalog, &config),
            vec![Field::SelectedEvents]
        );
        form.toggle_event(&EventId::new("prompt-quest"));
        assert!(is_step_valid(&form, Step::EventSelection, &catalog, &config));
    }

    #[test]
    fn team_name_only_required_when_configured() {
        let mut form = personal_info();
        form.toggle_event(&EventId::new("prompt-quest"));
        let catalog = EventCatalog::symposium();
        let strict = WizardConfig {
            require_team_name: true,
        };

        assert!(team_required(&form, &catalog));
        assert!(is_step_valid(
            &form,
            Step::EventSelection,
            &catalog,
            &WizardConfig::default()
        ));
        assert_eq!(
            missing_fields(&form, Step::EventSelection, &catalog, &strict),
            vec![Field::TeamName]
        );

        form.apply(FieldUpdate::TeamName("Analytical Engines".into()));
        assert!(is_step_valid(&form, Step::EventSelection, &catalog, &strict));
    }

    #[test]
    fn individual_events_never_need_a_team_name() {
        let mut form = personal_info();
        form.toggle_event(&EventId::new("binary-brawl"));
        let catalog = EventCatalog::symposium();
        let strict = WizardConfig {
            require_team_name: true,
        };
        assert!(!team_required(&form, &catalog));
        assert!(is_step_valid(&form, Step::EventSelection, &catalog, &strict));
    }

    #[test]
    fn final_step_is_always_valid() {
        let form = RegistrationForm::new();
        let catalog = EventCatalog::symposium();
        assert!(is_step_valid(
            &form,
            Step::FinalDetails,
            &catalog,
            &WizardConfig::default()
        ));
    }
}
