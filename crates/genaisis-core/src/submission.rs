//! # Submission Contract
//!
//! The boundary between the wizard and whatever records a registration.
//!
//! A [`SubmissionSink`] accepts the complete form and answers asynchronously
//! with an [`Acknowledgement`] or a [`SubmissionError`]. The core only defines
//! the contract and an in-memory sink; drivers provide the real ones
//! (simulated delay, file, webhook).

use crate::{RegistrationForm, SubmissionError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Mutex;

/// Receipt for an accepted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Reference the registrant can quote, e.g. `GEN-00042`.
    pub reference: String,
}

impl Acknowledgement {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Format the `n`th registration reference.
#[must_use]
pub fn registration_reference(n: u64) -> String {
    format!("GEN-{:05}", n)
}

/// Number of a reference produced by [`registration_reference`].
#[must_use]
pub fn reference_number(reference: &str) -> Option<u64> {
    reference.strip_prefix("GEN-")?.parse().ok()
}

/// Receives completed registrations.
///
/// Implementations must be `Send + Sync` so one sink can serve many wizards.
pub trait SubmissionSink: Send + Sync {
    /// Record `form`. May fail; the wizard then returns to the final step.
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send;
}

/// Sink that keeps every accepted form in memory.
///
/// Used by tests and dry runs. Can be switched into a failing mode to exercise
/// the retry path.
#[derive(Debug, Default)]
pub struct MemorySink {
    accepted: Mutex<Vec<RegistrationForm>>,
    failure: Mutex<Option<SubmissionError>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every submission fails with `error`.
    #[must_use]
    pub fn failing(error: SubmissionError) -> Self {
        Self {
            accepted: Mutex::new(Vec::new()),
            failure: Mutex::new(Some(error)),
        }
    }

    /// Make later submissions fail with `error`, or succeed again with `None`.
    pub fn set_failure(&self, error: Option<SubmissionError>) {
        let mut failure = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *failure = error;
    }

    /// Forms accepted so far, in submission order.
    #[must_use]
    pub fn accepted(&self) -> Vec<RegistrationForm> {
        self.accepted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, form: &RegistrationForm) -> Result<Acknowledgement, SubmissionError> {
        if let Some(error) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(error);
        }

        let mut accepted = self.accepted.lock().unwrap_or_else(|e| e.into_inner());
        accepted.push(form.clone());
        Ok(Acknowledgement::new(registration_reference(
            accepted.len() as u64,
        )))
    }
}

impl SubmissionSink for MemorySink {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        let result = self.record(form);
        async move { result }
    }
}

// =============================================================================
// TESTS
// =============================================================================
