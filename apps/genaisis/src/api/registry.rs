//! # Wizard Registry
//!
//! In-memory store of live wizard sessions, keyed by a numeric id.
//!
//! Sessions are ephemeral: nothing survives a restart, and a session is gone
//! once deleted. The registry is capped so a flood of `POST /registrations`
//! cannot exhaust memory.

use genaisis_core::{EventCatalog, RegistrationWizard, WizardConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WizardId(pub u64);

impl fmt::Display for WizardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live wizards plus the settings new ones are created with.
#[derive(Debug)]
pub struct WizardRegistry {
    catalog: Arc<EventCatalog>,
    config: WizardConfig,
    capacity: usize,
    next_id: u64,
    wizards: BTreeMap<WizardId, RegistrationWizard>,
}

impl WizardRegistry {
    #[must_use]
    pub fn new(catalog: Arc<EventCatalog>, config: WizardConfig, capacity: usize) -> Self {
        Self {
            catalog,
            config,
            capacity,
            next_id: 1,
            wizards: BTreeMap::new(),
        }
    }

    /// Start a new wizard. Returns `None` when the registry is full.
    pub fn create(&mut self) -> Option<(WizardId, &RegistrationWizard)> {
        if self.wizards.len() >= self.capacity {
            return None;
        }
        let id = WizardId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let wizard = RegistrationWizard::with_config(Arc::clone(&self.catalog), self.config);
        let wizard = self.wizards.entry(id).or_insert(wizard);
        Some((id, wizard))
    }

    #[must_use]
    pub fn get(&self, id: WizardId) -> Option<&RegistrationWizard> {
        self.wizards.get(&id)
    }

    pub fn get_mut(&mut self, id: WizardId) -> Option<&mut RegistrationWizard> {
        self.wizards.get_mut(&id)
    }

    /// Discard a wizard. Returns true if it existed.
    pub fn remove(&mut self, id: WizardId) -> bool {
        self.wizards.remove(&id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wizards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wizards.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use genaisis_core::Step;

    fn registry(capacity: usize) -> WizardRegistry {
        WizardRegistry::new(
            Arc::new(EventCatalog::symposium()),
            WizardConfig::default(),
            capacity,
        )
    }

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let mut reg = registry(8);
        let (a, _) = reg.create().expect("room");
        let (b, _) = reg.create().expect("room");
        assert_eq!((a, b), (WizardId(1), WizardId(2)));

        assert!(reg.remove(a));
        assert!(!reg.remove(a));
        let (c, wizard) = reg.create().expect("room");
        assert_eq!(c, WizardId(3));
        assert_eq!(wizard.current_step(), Step::PersonalInfo);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut reg = registry(1);
        assert!(reg.create().is_some());
        assert!(reg.create().is_none());
        assert_eq!(reg.len(), 1);
    }
}
