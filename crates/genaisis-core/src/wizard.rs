//! # Registration Wizard
//!
//! The three-step state machine that collects a [`RegistrationForm`].
//!
//! ```text
//!   PersonalInfo (1) ⇄ EventSelection (2) ⇄ FinalDetails (3) ──submit──▶ Submitted
//!        next() is guarded by the current step; prev() is not
//! ```
//!
//! ## Rejections
//!
//! Every operation returns a `Result`. A rejected operation leaves the wizard
//! exactly as it was; the error says why (for a guard, which fields are
//! missing). The single exception is a failed submission, which by design
//! moves the wizard from `Submitting` back to `Editing` on the final step with
//! the failure recorded in [`RegistrationWizard::last_error`].
//!
//! ## Submission
//!
//! `submit()` runs `begin_submission()`, awaits the sink, then
//! `finish_submission()`. Drivers that must not hold a lock across the await
//! call the two halves themselves. Between them the wizard is frozen.

use crate::submission::{Acknowledgement, SubmissionSink};
use crate::validation::{self, WizardConfig};
use crate::{
    EventCatalog, EventId, Field, FieldUpdate, RegistrationForm, RegistrationSummary, Step,
    SubmissionError, WizardError, WizardStatus,
};
use std::sync::Arc;

/// Holds one registrant's form and position in the wizard.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    catalog: Arc<EventCatalog>,
    config: WizardConfig,
    form: RegistrationForm,
    step: Step,
    status: WizardStatus,
    last_error: Option<SubmissionError>,
    receipt: Option<Acknowledgement>,
}

impl RegistrationWizard {
    /// Start a wizard on step 1 with an empty form.
    #[must_use]
    pub fn new(catalog: Arc<EventCatalog>) -> Self {
        Self::with_config(catalog, WizardConfig::default())
    }

    /// Start a wizard with explicit validation settings.
    #[must_use]
    pub fn with_config(catalog: Arc<EventCatalog>, config: WizardConfig) -> Self {
        Self {
            catalog,
            config,
            form: RegistrationForm::new(),
            step: Step::FIRST,
            status: WizardStatus::Editing,
            last_error: None,
            receipt: None,
        }
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    #[must_use]
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    #[must_use]
    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    #[must_use]
    pub fn current_step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn status(&self) -> WizardStatus {
        self.status
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.status == WizardStatus::Submitting
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == WizardStatus::Submitted
    }

    /// Failure of the most recent submission attempt, cleared on retry.
    #[must_use]
    pub fn last_error(&self) -> Option<&SubmissionError> {
        self.last_error.as_ref()
    }

    /// Receipt of the accepted submission.
    #[must_use]
    pub fn receipt(&self) -> Option<&Acknowledgement> {
        self.receipt.as_ref()
    }

    /// Confirmation details; only available once submitted.
    #[must_use]
    pub fn summary(&self) -> Option<RegistrationSummary> {
        self.is_submitted().then(|| self.form.summary())
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Fields blocking `step`, in form order.
    #[must_use]
    pub fn missing_fields(&self, step: Step) -> Vec<Field> {
        validation::missing_fields(&self.form, step, &self.catalog, &self.config)
    }

    /// The guard for leaving `step`.
    #[must_use]
    pub fn is_step_valid(&self, step: Step) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// Fields blocking the action offered on the current step.
    ///
    /// Before the final step that is "Next", guarded by the current step
    /// alone. On the final step it is "Submit", which re-checks every step,
    /// so the list covers all of them in step order.
    #[must_use]
    pub fn blocking_fields(&self) -> Vec<Field> {
        if self.step == Step::LAST {
            Step::ALL
                .into_iter()
                .flat_map(|step| self.missing_fields(step))
                .collect()
        } else {
            self.missing_fields(self.step)
        }
    }

    /// Whether "Next" (or "Submit" on the final step) may be offered.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.status == WizardStatus::Editing && self.blocking_fields().is_empty()
    }

    /// Whether the form currently needs a team, given the selected events.
    #[must_use]
    pub fn team_required(&self) -> bool {
        validation::team_required(&self.form, &self.catalog)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.status {
            WizardStatus::Editing => Ok(()),
            WizardStatus::Submitting => Err(WizardError::SubmissionInFlight),
            WizardStatus::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    fn guard(&self, step: Step) -> Result<(), WizardError> {
        let missing = self.missing_fields(step);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WizardError::StepIncomplete { step, missing })
        }
    }

    // =========================================================================
    // EDITING
    // =========================================================================

    /// Write one field. Does not change the step.
    pub fn set_field(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.form.apply(update);
        Ok(())
    }

    /// Write several fields in order; all or nothing.
    pub fn set_fields(
        &mut self,
        updates: impl IntoIterator<Item = FieldUpdate>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        for update in updates {
            self.form.apply(update);
        }
        Ok(())
    }

    /// Select or deselect an event. Returns true if it is now selected.
    pub fn toggle_event(&mut self, id: &EventId) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        if !self.catalog.contains(id) {
            return Err(WizardError::UnknownEvent(id.clone()));
        }
        Ok(self.form.toggle_event(id))
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Move forward one step if the current step is complete.
    pub fn next(&mut self) -> Result<Step, WizardError> {
        self.ensure_editable()?;
        let target = self.step.next().ok_or(WizardError::NoNextStep)?;
        self.guard(self.step)?;
        self.step = target;
        Ok(target)
    }

    /// Move back one step.
    pub fn prev(&mut self) -> Result<Step, WizardError> {
        self.ensure_editable()?;
        let target = self.step.prev().ok_or(WizardError::NoPreviousStep)?;
        self.step = target;
        Ok(target)
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Freeze the wizard and hand out the form to send.
    ///
    /// Only allowed on the final step. Every step's guard is re-checked, since
    /// earlier fields stay editable while on the final step.
    pub fn begin_submission(&mut self) -> Result<RegistrationForm, WizardError> {
        self.ensure_editable()?;
        if self.step != Step::LAST {
            return Err(WizardError::NotOnFinalStep(self.step));
        }
        for step in Step::ALL {
            self.guard(step)?;
        }

        self.status = WizardStatus::Submitting;
        self.last_error = None;
        Ok(self.form.clone())
    }

    /// Record the sink's answer for the submission in flight.
    ///
    /// Success is terminal. Failure returns the wizard to the final step and
    /// keeps the error for display; the caller may retry.
    pub fn finish_submission(
        &mut self,
        result: Result<Acknowledgement, SubmissionError>,
    ) -> Result<Acknowledgement, WizardError> {
        if self.status != WizardStatus::Submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }

        match result {
            Ok(ack) => {
                self.status = WizardStatus::Submitted;
                self.receipt = Some(ack.clone());
                Ok(ack)
            }
            Err(error) => {
                self.status = WizardStatus::Editing;
                self.step = Step::LAST;
                self.last_error = Some(error.clone());
                Err(WizardError::SubmissionFailed(error))
            }
        }
    }

    /// Submit the form to `sink` and wait for the answer.
    pub async fn submit<S: SubmissionSink>(
        &mut self,
        sink: &S,
    ) -> Result<Acknowledgement, WizardError> {
        let form = self.begin_submission()?;
        let result = sink.submit(&form).await;
        self.finish_submission(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Year;
    use crate::submission::MemorySink;

    fn wizard() -> RegistrationWizard {
        RegistrationWizard::new(Arc::new(EventCatalog::symposium()))
    }

    fn fill_personal_info(w: &mut RegistrationWizard) {
        w.set_fields([
            FieldUpdate::FirstName("Ada".into()),
            FieldUpdate::LastName("Lovelace".into()),
            FieldUpdate::Email("ada@x.com".into()),
            FieldUpdate::Phone("+911234567890".into()),
            FieldUpdate::College("SJCE".into()),
            FieldUpdate::Year(Some(Year::Second)),
            FieldUpdate::Department("AI&ML".into()),
        ])
        .expect("editable");
    }

    fn at_final_step() -> RegistrationWizard {
        let mut w = wizard();
        fill_personal_info(&mut w);
        w.next().expect("to step 2");
        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("toggle");
        w.next().expect("to step 3");
        w
    }

    #[test]
    fn starts_on_step_one_editing() {
        let w = wizard();
        assert_eq!(w.current_step(), Step::PersonalInfo);
        assert_eq!(w.status(), WizardStatus::Editing);
        assert!(!w.can_advance());
        assert!(w.summary().is_none());
    }

    #[test]
    fn next_is_guarded() {
        let mut w = wizard();
        let err = w.next().expect_err("incomplete");
        assert!(err.is_guard_rejection());
        assert_eq!(w.current_step(), Step::PersonalInfo);

        fill_personal_info(&mut w);
        assert!(w.can_advance());
        assert_eq!(w.next(), Ok(Step::EventSelection));
    }

    #[test]
    fn prev_stops_at_first_step() {
        let mut w = wizard();
        assert_eq!(w.prev(), Err(WizardError::NoPreviousStep));
        assert_eq!(w.current_step(), Step::PersonalInfo);
    }

    #[test]
    fn next_stops_at_last_step() {
        let mut w = at_final_step();
        assert_eq!(w.next(), Err(WizardError::NoNextStep));
        assert_eq!(w.current_step(), Step::FinalDetails);
    }

    #[test]
    fn unknown_event_is_rejected() {
        let mut w = wizard();
        let id = EventId::new("robot-rumble");
        assert_eq!(w.toggle_event(&id), Err(WizardError::UnknownEvent(id)));
        assert!(w.form().selected_events.is_empty());
    }

    #[test]
    fn submit_requires_final_step() {
        let mut w = wizard();
        fill_personal_info(&mut w);
        let before = w.clone();

        assert_eq!(
            w.begin_submission(),
            Err(WizardError::NotOnFinalStep(Step::PersonalInfo))
        );
        assert_eq!(w.status(), before.status());
        assert_eq!(w.form(), before.form());
    }

    #[test]
    fn submit_rechecks_earlier_steps() {
        let mut w = at_final_step();
        w.set_field(FieldUpdate::Email(String::new()))
            .expect("editable");

        assert_eq!(
            w.begin_submission(),
            Err(WizardError::StepIncomplete {
                step: Step::PersonalInfo,
                missing: vec![Field::Email],
            })
        );
        assert_eq!(w.status(), WizardStatus::Editing);
    }

    #[test]
    fn final_step_blockers_cover_earlier_steps() {
        let mut w = at_final_step();
        assert!(w.can_advance());
        assert!(w.blocking_fields().is_empty());

        w.set_field(FieldUpdate::Email(String::new()))
            .expect("editable");
        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("toggle");

        assert!(w.is_step_valid(Step::FinalDetails));
        assert!(!w.can_advance());
        assert_eq!(
            w.blocking_fields(),
            vec![Field::Email, Field::SelectedEvents]
        );
        assert!(w.begin_submission().is_err());
    }

    #[test]
    fn blockers_before_final_step_are_current_step_only() {
        let mut w = wizard();
        fill_personal_info(&mut w);
        w.next().expect("to step 2");
        w.set_field(FieldUpdate::Phone(String::new()))
            .expect("editable");

        assert_eq!(w.blocking_fields(), vec![Field::SelectedEvents]);
    }

    #[test]
    fn wizard_is_frozen_while_submitting() {
        let mut w = at_final_step();
        w.begin_submission().expect("begin");

        assert!(w.is_submitting());
        assert!(!w.can_advance());
        assert_eq!(
            w.set_field(FieldUpdate::Experience("x".into())),
            Err(WizardError::SubmissionInFlight)
        );
        assert_eq!(w.prev(), Err(WizardError::SubmissionInFlight));
        assert_eq!(
            w.toggle_event(&EventId::new("tech-titans")),
            Err(WizardError::SubmissionInFlight)
        );
        assert_eq!(w.begin_submission(), Err(WizardError::SubmissionInFlight));
    }

    #[test]
    fn finish_without_begin_is_rejected() {
        let mut w = at_final_step();
        assert_eq!(
            w.finish_submission(Ok(Acknowledgement::new("GEN-00001"))),
            Err(WizardError::NoSubmissionInFlight)
        );
        assert!(!w.is_submitted());
    }

    #[test]
    fn failed_submission_returns_to_final_step() {
        let mut w = at_final_step();
        w.begin_submission().expect("begin");
        let error = SubmissionError::Unavailable("offline".into());

        let result = w.finish_submission(Err(error.clone()));
        assert_eq!(result, Err(WizardError::SubmissionFailed(error.clone())));
        assert_eq!(w.status(), WizardStatus::Editing);
        assert_eq!(w.current_step(), Step::FinalDetails);
        assert_eq!(w.last_error(), Some(&error));

        // Retry clears the error.
        w.begin_submission().expect("retry");
        assert!(w.last_error().is_none());
    }

    #[tokio::test]
    async fn submit_is_terminal() {
        let mut w = at_final_step();
        let sink = MemorySink::new();

        let ack = w.submit(&sink).await.expect("submit");
        assert_eq!(ack.reference, "GEN-00001");
        assert!(w.is_submitted());
        assert_eq!(w.receipt(), Some(&ack));
        assert_eq!(
            w.summary().map(|s| s.full_name),
            Some("Ada Lovelace".to_string())
        );

        assert_eq!(
            w.set_field(FieldUpdate::FirstName("Eve".into())),
            Err(WizardError::AlreadySubmitted)
        );
        assert_eq!(w.prev(), Err(WizardError::AlreadySubmitted));
        assert_eq!(w.next(), Err(WizardError::AlreadySubmitted));
        assert_eq!(w.submit(&sink).await, Err(WizardError::AlreadySubmitted));
        assert_eq!(sink.accepted().len(), 1);
        assert_eq!(w.form().first_name, "Ada");
    }
}
