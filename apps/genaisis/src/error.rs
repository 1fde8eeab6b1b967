//! # Application Errors
//!
//! Everything the binary can fail on outside the wizard itself.

use genaisis_core::WizardError;
use thiserror::Error;

/// Errors raised by the server, CLI and sinks setup.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file is missing, malformed or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// An answer sheet could not be read or parsed.
    #[error("Answer sheet error: {0}")]
    Answers(String),

    /// A wizard operation was rejected.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// The HTTP server failed to start or crashed.
    #[error("Server error: {0}")]
    Server(String),
}
