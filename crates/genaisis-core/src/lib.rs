//! # genaisis-core
//!
//! The registration wizard for the GENAISIS AI/ML symposium - THE WIZARD.
//!
//! This crate implements a small, explicit state machine that collects a
//! registration over three steps:
//!
//! 1. Personal information (name, contact, college, year, department)
//! 2. Event selection (at least one event from the catalog, optional team)
//! 3. Final details (optional free text), then submission
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Owns all wizard state; a presentation layer only reads it and calls
//!   transitions
//! - Rejects invalid transitions with a typed error and leaves state untouched
//! - Has NO runtime, network or file I/O; submission goes through the
//!   [`SubmissionSink`] trait, implemented by drivers
//! - Never panics

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod form;
pub mod primitives;
pub mod submission;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{EventId, Field, Step, SubmissionError, WizardError, WizardStatus, Year};

// =============================================================================
// RE-EXPORTS: Wizard
// =============================================================================

pub use catalog::{Coordinator, EventCatalog, EventInfo, TeamSize};
pub use form::{FieldUpdate, RegistrationForm, RegistrationSummary};
pub use submission::{
    Acknowledgement, MemorySink, SubmissionSink, reference_number, registration_reference,
};
pub use validation::WizardConfig;
pub use wizard::RegistrationWizard;
