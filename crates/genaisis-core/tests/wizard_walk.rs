//! # Wizard Walk Tests
//!
//! End-to-end walks through the three steps, grouped by stage.
//!
//! - W1: Personal information
//! - W2: Event selection
//! - W3: Submission

use genaisis_core::{
    Acknowledgement, EventCatalog, EventId, Field, FieldUpdate, MemorySink, RegistrationForm,
    RegistrationWizard, Step, SubmissionError, SubmissionSink, WizardConfig, WizardError,
    WizardStatus, Year,
};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

fn ada() -> Vec<FieldUpdate> {
    vec![
        FieldUpdate::FirstName("Ada".into()),
        FieldUpdate::LastName("Lovelace".into()),
        FieldUpdate::Email("ada@x.com".into()),
        FieldUpdate::Phone("+911234567890".into()),
        FieldUpdate::College("SJCE".into()),
        FieldUpdate::Year(Year::from_code("2")),
        FieldUpdate::Department("AI&ML".into()),
    ]
}

fn wizard() -> RegistrationWizard {
    RegistrationWizard::new(Arc::new(EventCatalog::symposium()))
}

// =============================================================================
// W1: PERSONAL INFORMATION
// =============================================================================

mod w1_personal_info {
    use super::*;

    /// W1.1: A single blank required field keeps the wizard on step 1.
    #[test]
    fn blank_first_name_blocks_next() {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        w.set_field(FieldUpdate::FirstName(String::new()))
            .expect("editable");

        let result = w.next();
        assert_eq!(
            result,
            Err(WizardError::StepIncomplete {
                step: Step::PersonalInfo,
                missing: vec![Field::FirstName],
            })
        );
        assert_eq!(w.current_step(), Step::PersonalInfo);
    }

    /// W1.2: An unchosen year counts as missing.
    #[test]
    fn missing_year_blocks_next() {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        w.set_field(FieldUpdate::Year(None)).expect("editable");

        assert_eq!(w.missing_fields(Step::PersonalInfo), vec![Field::Year]);
        assert!(w.next().is_err());
    }

    /// W1.3: Editing fields never moves the wizard.
    #[test]
    fn set_field_does_not_change_step() {
        let mut w = wizard();
        for update in ada() {
            w.set_field(update).expect("editable");
            assert_eq!(w.current_step(), Step::PersonalInfo);
        }
    }
}

// =============================================================================
// W2: EVENT SELECTION
// =============================================================================

mod w2_event_selection {
    use super::*;

    /// W2.1: The documented walk reaches step 3 after two `next()` calls.
    #[test]
    fn ada_reaches_final_step() {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        assert_eq!(w.next(), Ok(Step::EventSelection));

        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("known event");
        assert_eq!(w.next(), Ok(Step::FinalDetails));
        assert_eq!(w.current_step(), Step::FinalDetails);
    }

    /// W2.2: Deselecting the only event blocks step 2 again.
    #[test]
    fn empty_selection_blocks_next() {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        w.next().expect("step 2");

        let id = EventId::new("venture-vault");
        assert_eq!(w.toggle_event(&id), Ok(true));
        assert_eq!(w.toggle_event(&id), Ok(false));
        assert_eq!(
            w.next(),
            Err(WizardError::StepIncomplete {
                step: Step::EventSelection,
                missing: vec![Field::SelectedEvents],
            })
        );
    }

    /// W2.3: Going back keeps everything entered on step 2.
    #[test]
    fn prev_keeps_selection() {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        w.next().expect("step 2");
        w.toggle_event(&EventId::new("tech-titans"))
            .expect("known event");

        assert_eq!(w.prev(), Ok(Step::PersonalInfo));
        assert_eq!(w.next(), Ok(Step::EventSelection));
        assert!(
            w.form()
                .selected_events
                .contains(&EventId::new("tech-titans"))
        );
    }

    /// W2.4: Strict mode asks for a team name for team events only.
    #[test]
    fn strict_mode_requires_team_name() {
        let config = WizardConfig {
            require_team_name: true,
        };
        let mut w = RegistrationWizard::with_config(Arc::new(EventCatalog::symposium()), config);
        w.set_fields(ada()).expect("editable");
        w.next().expect("step 2");
        w.toggle_event(&EventId::new("brain-matrix"))
            .expect("known event");

        assert!(w.team_required());
        assert_eq!(w.missing_fields(Step::EventSelection), vec![Field::TeamName]);
        assert!(w.next().is_err());

        w.set_field(FieldUpdate::TeamName("Difference Engine".into()))
            .expect("editable");
        assert_eq!(w.next(), Ok(Step::FinalDetails));
    }
}

// =============================================================================
// W3: SUBMISSION
// =============================================================================

mod w3_submission {
    use super::*;

    fn at_final_step() -> RegistrationWizard {
        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        w.next().expect("step 2");
        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("known event");
        w.next().expect("step 3");
        w
    }

    /// W3.1: Submitting from steps 1 and 2 changes nothing.
    #[tokio::test]
    async fn submit_outside_final_step_is_rejected() {
        let sink = MemorySink::new();

        let mut w = wizard();
        w.set_fields(ada()).expect("editable");
        assert_eq!(
            w.submit(&sink).await,
            Err(WizardError::NotOnFinalStep(Step::PersonalInfo))
        );

        w.next().expect("step 2");
        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("known event");
        let before = w.form().clone();
        assert_eq!(
            w.submit(&sink).await,
            Err(WizardError::NotOnFinalStep(Step::EventSelection))
        );

        assert_eq!(w.current_step(), Step::EventSelection);
        assert_eq!(w.status(), WizardStatus::Editing);
        assert_eq!(w.form(), &before);
        assert!(sink.accepted().is_empty());
    }

    /// W3.2: The submitted record is exactly the union of all edits.
    #[tokio::test]
    async fn full_walk_round_trips_form() {
        let sink = MemorySink::new();
        let mut w = wizard();

        w.set_fields(ada()).expect("editable");
        w.next().expect("step 2");
        w.toggle_event(&EventId::new("binary-brawl"))
            .expect("known event");
        w.toggle_event(&EventId::new("prompt-quest"))
            .expect("known event");
        w.set_field(FieldUpdate::TeamName("Engines".into()))
            .expect("editable");
        w.next().expect("step 3");
        w.set_field(FieldUpdate::Experience("Notes on the engine".into()))
            .expect("editable");
        w.set_field(FieldUpdate::DietaryRestrictions("none".into()))
            .expect("editable");

        let ack = w.submit(&sink).await.expect("submitted");
        assert_eq!(w.receipt(), Some(&ack));

        let mut expected = RegistrationForm::new();
        for update in ada() {
            expected.apply(update);
        }
        expected.selected_events = BTreeSet::from([
            EventId::new("binary-brawl"),
            EventId::new("prompt-quest"),
        ]);
        expected.team_name = "Engines".into();
        expected.experience = "Notes on the engine".into();
        expected.dietary_restrictions = "none".into();

        assert_eq!(sink.accepted(), vec![expected.clone()]);
        assert_eq!(w.form(), &expected);
    }

    /// W3.3: After success the wizard ignores every mutation.
    #[tokio::test]
    async fn submitted_wizard_is_immutable() {
        let sink = MemorySink::new();
        let mut w = at_final_step();
        w.submit(&sink).await.expect("submitted");
        let frozen = w.form().clone();

        assert_eq!(
            w.set_field(FieldUpdate::Email("eve@x.com".into())),
            Err(WizardError::AlreadySubmitted)
        );
        assert_eq!(
            w.toggle_event(&EventId::new("tech-titans")),
            Err(WizardError::AlreadySubmitted)
        );
        assert_eq!(w.next(), Err(WizardError::AlreadySubmitted));
        assert_eq!(w.prev(), Err(WizardError::AlreadySubmitted));

        assert!(w.is_submitted());
        assert_eq!(w.current_step(), Step::FinalDetails);
        assert_eq!(w.form(), &frozen);
        let summary = w.summary().expect("summary");
        assert_eq!(summary.email, "ada@x.com");
        assert_eq!(summary.event_count, 1);
    }

    /// W3.4: A failing sink sends the wizard back to step 3; retry succeeds.
    #[tokio::test]
    async fn failed_submission_can_be_retried() {
        let sink = MemorySink::failing(SubmissionError::Unavailable("maintenance".into()));
        let mut w = at_final_step();

        let result = w.submit(&sink).await;
        assert!(matches!(result, Err(WizardError::SubmissionFailed(_))));
        assert_eq!(w.status(), WizardStatus::Editing);
        assert_eq!(w.current_step(), Step::FinalDetails);
        assert_eq!(
            w.last_error(),
            Some(&SubmissionError::Unavailable("maintenance".into()))
        );

        // Still editable between attempts.
        w.set_field(FieldUpdate::Expectations("Good talks".into()))
            .expect("editable");

        sink.set_failure(None);
        let ack = w.submit(&sink).await.expect("retry");
        assert_eq!(ack.reference, "GEN-00001");
        assert!(w.last_error().is_none());
        assert_eq!(sink.accepted()[0].expectations, "Good talks");
    }

    /// A sink that checks the wizard froze the form it was given.
    struct EchoSink;

    impl SubmissionSink for EchoSink {
        fn submit(
            &self,
            form: &RegistrationForm,
        ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
            let reference = format!("{}-{}", form.first_name, form.selected_events.len());
            async move { Ok(Acknowledgement::new(reference)) }
        }
    }

    /// W3.5: Any `SubmissionSink` plugs in without touching the wizard.
    #[tokio::test]
    async fn custom_sink_sees_snapshot() {
        let mut w = at_final_step();
        let ack = w.submit(&EchoSink).await.expect("submitted");
        assert_eq!(ack.reference, "Ada-1");
    }
}
