//! # Configuration
//!
//! Application settings, read from an optional TOML file and then overridden
//! by environment variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! max_active_wizards = 1024
//! cors_origins = ["https://genaisis.example"]
//!
//! [submission]
//! kind = "file"            # simulated | file | webhook
//! path = "registrations.jsonl"
//! timeout_ms = 10000
//!
//! [wizard]
//! require_team_name = false
//!
//! [[events]]               # optional: replaces the built-in catalog
//! id = "quiz"
//! name = "QUIZ"
//! icon = "❓"
//! team_size = "2-3"
//! ```
//!
//! ## Environment Overrides
//!
//! - `GENAISIS_API_KEY`: Bearer token required by the API (empty disables)
//! - `GENAISIS_RATE_LIMIT`: Requests per second, 0 disables
//! - `GENAISIS_CORS_ORIGINS`: Comma-separated origins, or `*` for any

use crate::error::AppError;
use genaisis_core::primitives::{DEFAULT_SUBMIT_TIMEOUT_MS, SIMULATED_SUBMIT_DELAY_MS};
use genaisis_core::{EventCatalog, EventInfo, WizardConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for any config file we are willing to read (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Live wizard sessions kept in memory at most.
    pub max_active_wizards: usize,
    /// `None` means localhost only; `["*"]` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Bearer token for the API. Prefer `GENAISIS_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            max_active_wizards: 1024,
            cors_origins: None,
            api_key: None,
        }
    }
}

/// Which sink receives completed registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Wait `delay_ms`, then accept.
    #[default]
    Simulated,
    /// Append to a JSON-lines file.
    File,
    /// POST to `url`.
    Webhook,
}

/// `[submission]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionConfig {
    pub kind: SinkKind,
    pub delay_ms: u64,
    pub path: PathBuf,
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Simulated,
            delay_ms: SIMULATED_SUBMIT_DELAY_MS,
            path: PathBuf::from("registrations.jsonl"),
            url: None,
            token: None,
            timeout_ms: DEFAULT_SUBMIT_TIMEOUT_MS,
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub submission: SubmissionConfig,
    pub wizard: WizardConfig,
    /// Replaces the built-in symposium catalog when present.
    pub events: Option<Vec<EventInfo>>,
}

impl AppConfig {
    /// Load from `path` (or defaults when `None`) and apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without applying the environment.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "'{}' is {} bytes, maximum is {}",
                path.display(),
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Cannot read '{}': {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Apply `GENAISIS_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GENAISIS_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(limit) = lookup("GENAISIS_RATE_LIMIT").and_then(|s| s.trim().parse().ok()) {
            self.server.rate_limit = limit;
        }
        if let Some(origins) = lookup("GENAISIS_CORS_ORIGINS") {
            self.server.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.max_active_wizards == 0 {
            return Err(AppError::Config(
                "server.max_active_wizards must be at least 1".to_string(),
            ));
        }
        if self.submission.timeout_ms == 0 {
            return Err(AppError::Config(
                "submission.timeout_ms must be at least 1".to_string(),
            ));
        }
        if self.submission.kind == SinkKind::Webhook && self.submission.url.is_none() {
            return Err(AppError::Config(
                "submission.url is required for the webhook sink".to_string(),
            ));
        }
        self.catalog().map(|_| ())
    }

    /// The configured API key, if authentication is enabled.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.server
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// The event catalog: the `[[events]]` override or the symposium events.
    pub fn catalog(&self) -> Result<EventCatalog, AppError> {
        match &self.events {
            Some(events) => Ok(EventCatalog::new(events.clone())?),
            None => Ok(EventCatalog::symposium()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
