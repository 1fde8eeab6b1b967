//! # Wizard Primitives
//!
//! Hardcoded constants shared by the wizard and its drivers.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Drivers may tighten them (for example, a shorter timeout) but the core
//! never reads configuration.

/// Number of steps in the registration wizard.
pub const STEP_COUNT: u8 = 3;

/// Team size recorded for a fresh form.
pub const DEFAULT_TEAM_SIZE: u8 = 1;

/// Delay of the simulated submission, in milliseconds.
///
/// Matches the fixed pause the symposium site used before showing the
/// confirmation screen.
pub const SIMULATED_SUBMIT_DELAY_MS: u64 = 2000;

/// Default deadline for a submission sink, in milliseconds.
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 10_000;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for single-line fields (names, email, phone, college...).
///
/// Enforced at driver boundaries, before values reach the wizard.
pub const MAX_FIELD_LENGTH: usize = 256;

/// Maximum length for the free-text fields of step 3.
pub const MAX_FREE_TEXT_LENGTH: usize = 4096;

/// Maximum number of events in a catalog.
pub const MAX_CATALOG_EVENTS: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Step;

    #[test]
    fn step_count_matches_step_enum() {
        assert_eq!(usize::from(STEP_COUNT), Step::ALL.len());
        assert_eq!(Step::LAST.number(), STEP_COUNT);
    }

    #[test]
    fn simulated_delay_fits_inside_timeout() {
        assert!(SIMULATED_SUBMIT_DELAY_MS < DEFAULT_SUBMIT_TIMEOUT_MS);
    }
}
