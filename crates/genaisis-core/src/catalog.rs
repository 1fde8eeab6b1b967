//! # Event Catalog
//!
//! The fixed, ordered list of symposium events a registrant can pick from.
//!
//! The catalog is supplied when a wizard is constructed and is read-only from
//! then on. Wizards share it through an `Arc`.

use crate::primitives::MAX_CATALOG_EVENTS;
use crate::{EventId, WizardError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// TEAM SIZE
// =============================================================================

/// How many people compete together in an event.
///
/// Written the way the event cards show it: `"Individual"`, `"2"` or `"2-3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TeamSize {
    /// One participant, no team.
    Individual,
    /// A fixed team size.
    Exactly(u8),
    /// An inclusive range of team sizes.
    Range { min: u8, max: u8 },
}

impl TeamSize {
    /// Smallest allowed team.
    #[must_use]
    pub const fn min(self) -> u8 {
        match self {
            Self::Individual => 1,
            Self::Exactly(n) => n,
            Self::Range { min, .. } => min,
        }
    }

    /// Largest allowed team.
    #[must_use]
    pub const fn max(self) -> u8 {
        match self {
            Self::Individual => 1,
            Self::Exactly(n) => n,
            Self::Range { max, .. } => max,
        }
    }

    /// An event requires a team when it cannot be entered alone.
    #[must_use]
    pub const fn requires_team(self) -> bool {
        self.min() > 1
    }

    /// Check whether `size` people may enter together.
    #[must_use]
    pub const fn allows(self, size: u8) -> bool {
        size >= self.min() && size <= self.max()
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.write_str("Individual"),
            Self::Exactly(n) => write!(f, "{}", n),
            Self::Range { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

impl FromStr for TeamSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("individual") {
            return Ok(Self::Individual);
        }

        let parse = |part: &str| -> Result<u8, String> {
            match part.trim().parse::<u8>() {
                Ok(0) => Err("team size must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(_) => Err(format!("invalid team size '{}'", s)),
            }
        };

        match s.split_once('-') {
            Some((lo, hi)) => {
                let (min, max) = (parse(lo)?, parse(hi)?);
                if min > max {
                    return Err(format!("team size range '{}' is reversed", s));
                }
                if min == max {
                    Ok(Self::Exactly(min))
                } else {
                    Ok(Self::Range { min, max })
                }
            }
            None => match parse(s)? {
                1 => Ok(Self::Individual),
                n => Ok(Self::Exactly(n)),
            },
        }
    }
}

impl TryFrom<String> for TeamSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamSize> for String {
    fn from(size: TeamSize) -> Self {
        size.to_string()
    }
}

// =============================================================================
// EVENT INFO
// =============================================================================

/// Event coordinator contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// One selectable event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: EventId,
    /// Display name, e.g. `BINARY BRAWL`.
    pub name: String,
    pub icon: String,
    pub team_size: TeamSize,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub participants: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub coordinator: Option<Coordinator>,
}

impl EventInfo {
    /// Create an event with only the fields the wizard needs.
    #[must_use]
    pub fn new(
        id: impl Into<EventId>,
        name: impl Into<String>,
        icon: impl Into<String>,
        team_size: TeamSize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            team_size,
            summary: String::new(),
            participants: String::new(),
            duration: String::new(),
            prize: String::new(),
            coordinator: None,
        }
    }

    /// Whether entering this event needs a team.
    #[must_use]
    pub fn requires_team(&self) -> bool {
        self.team_size.requires_team()
    }
}

// =============================================================================
// EVENT CATALOG
// =============================================================================

/// Ordered, duplicate-free list of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventCatalog {
    events: Vec<EventInfo>,
}

impl EventCatalog {
    /// Build a catalog, rejecting empty lists and duplicate identifiers.
    pub fn new(events: Vec<EventInfo>) -> Result<Self, WizardError> {
        if events.is_empty() {
            return Err(WizardError::InvalidCatalog(
                "catalog has no events".to_string(),
            ));
        }
        if events.len() > MAX_CATALOG_EVENTS {
            return Err(WizardError::InvalidCatalog(format!(
                "catalog has {} events, maximum is {}",
                events.len(),
                MAX_CATALOG_EVENTS
            )));
        }

        let mut seen = BTreeSet::new();
        for event in &events {
            if event.id.as_str().trim().is_empty() {
                return Err(WizardError::InvalidCatalog(
                    "event with empty id".to_string(),
                ));
            }
            if !seen.insert(&event.id) {
                return Err(WizardError::InvalidCatalog(format!(
                    "duplicate event id '{}'",
                    event.id
                )));
            }
        }

        Ok(Self { events })
    }

    /// The five GENAISIS events.
    #[must_use]
    pub fn symposium() -> Self {
        let events = vec![
            EventInfo {
                summary: "Master the art of AI prompt engineering in this creative challenge."
                    .to_string(),
                participants: "50 teams".to_string(),
                duration: "3 hours".to_string(),
                prize: "₹15,000".to_string(),
                coordinator: Some(coordinator(
                    "Dr. Sarah Johnson",
                    "+91 98765 43210",
                    "sarah.johnson@sjce.ac.in",
                )),
                ..EventInfo::new(
                    "prompt-quest",
                    "PROMPT QUEST",
                    "🔍",
                    TeamSize::Range { min: 2, max: 3 },
                )
            },
            EventInfo {
                summary: "Ultimate coding competition testing your algorithmic prowess."
                    .to_string(),
                participants: "100 individual".to_string(),
                duration: "4 hours".to_string(),
                prize: "₹20,000".to_string(),
                coordinator: Some(coordinator(
                    "Prof. Michael Chen",
                    "+91 87654 32109",
                    "michael.chen@sjce.ac.in",
                )),
                ..EventInfo::new("binary-brawl", "BINARY BRAWL", "💻", TeamSize::Individual)
            },
            EventInfo {
                summary: "Pitch your innovative AI startup ideas to industry experts.".to_string(),
                participants: "25 teams".to_string(),
                duration: "5 hours".to_string(),
                prize: "₹30,000".to_string(),
                coordinator: Some(coordinator(
                    "Dr. Priya Sharma",
                    "+91 76543 21098",
                    "priya.sharma@sjce.ac.in",
                )),
                ..EventInfo::new(
                    "venture-vault",
                    "VENTURE VAULT",
                    "💡",
                    TeamSize::Range { min: 3, max: 5 },
                )
            },
            EventInfo {
                summary: "Test your AI knowledge in this intense quiz competition.".to_string(),
                participants: "75 teams".to_string(),
                duration: "4 hours".to_string(),
                prize: "₹12,000".to_string(),
                coordinator: Some(coordinator(
                    "Dr. Rajesh Kumar",
                    "+91 65432 10987",
                    "rajesh.kumar@sjce.ac.in",
                )),
                ..EventInfo::new("brain-matrix", "BRAIN MATRIX", "🧠", TeamSize::Exactly(2))
            },
            EventInfo {
                summary: "Build revolutionary AI applications in this intensive hackathon."
                    .to_string(),
                participants: "40 teams".to_string(),
                duration: "24 hours".to_string(),
                prize: "₹50,000".to_string(),
                coordinator: Some(coordinator(
                    "Prof. Lisa Wong",
                    "+91 54321 09876",
                    "lisa.wong@sjce.ac.in",
                )),
                ..EventInfo::new(
                    "tech-titans",
                    "TECH TITANS",
                    "🚀",
                    TeamSize::Range { min: 3, max: 4 },
                )
            },
        ];
        Self { events }
    }

    /// Look up an event.
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&EventInfo> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Check if an event is in the catalog.
    #[must_use]
    pub fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    /// Events in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EventInfo> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::symposium()
    }
}

impl<'de> Deserialize<'de> for EventCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let events = Vec::<EventInfo>::deserialize(deserializer)?;
        Self::new(events).map_err(serde::de::Error::custom)
    }
}

fn coordinator(name: &str, phone: &str, email: &str) -> Coordinator {
    Coordinator {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
