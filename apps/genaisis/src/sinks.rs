//! # Submission Sinks
//!
//! Concrete receivers for completed registrations.
//!
//! - [`SimulatedSink`]: waits a fixed delay and accepts (the behaviour of the
//!   public registration page, which never had a backend)
//! - [`JsonlSink`]: appends one JSON object per registration to a file
//! - [`WebhookSink`]: POSTs the form to an HTTP endpoint
//! - [`TimeoutSink`]: puts a deadline on any of the above
//!
//! [`build_sink`] picks one from [`SubmissionConfig`].

use crate::config::{SinkKind, SubmissionConfig};
use crate::error::AppError;
use genaisis_core::{
    Acknowledgement, RegistrationForm, SubmissionError, SubmissionSink, reference_number,
    registration_reference,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// The sink type the server and CLI run with.
pub type AppSink = TimeoutSink<ConfiguredSink>;

// =============================================================================
// SIMULATED
// =============================================================================

/// Accepts every registration after a fixed delay.
#[derive(Debug)]
pub struct SimulatedSink {
    delay: Duration,
    accepted: AtomicU64,
}

impl SimulatedSink {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            accepted: AtomicU64::new(0),
        }
    }
}

impl SubmissionSink for SimulatedSink {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        let events = form.selected_events.len();
        async move {
            tokio::time::sleep(self.delay).await;
            let n = self.accepted.fetch_add(1, Ordering::SeqCst) + 1;
            let reference = registration_reference(n);
            tracing::info!(
                event = "registration_accepted",
                sink = "simulated",
                reference = %reference,
                events,
                "Registration accepted"
            );
            Ok(Acknowledgement::new(reference))
        }
    }
}

// =============================================================================
// JSON LINES FILE
// =============================================================================

/// One line of the registrations file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub reference: String,
    /// Seconds since the Unix epoch.
    pub received_at: u64,
    pub form: RegistrationForm,
}

/// Appends registrations to a JSON-lines file.
///
/// References continue from the highest one already in the file. A number is
/// taken before the line is written and never handed out again, even when the
/// write fails or the caller gives up on it.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    written: Mutex<u64>,
}

impl JsonlSink {
    /// Open (or prepare to create) the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let written = match std::fs::File::open(&path) {
            Ok(file) => std::io::BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .filter(|line| !line.trim().is_empty())
                .map(|line| last_reference(&line))
                .fold(0, u64::max),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(AppError::Io(format!(
                    "Cannot open '{}': {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(Self {
            path,
            written: Mutex::new(written),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, form: RegistrationForm) -> Result<Acknowledgement, SubmissionError> {
        // Held until the line is flushed; the number is taken first.
        let mut written = self.written.lock().await;
        *written += 1;
        let reference = registration_reference(*written);
        let received_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let record = RegistrationRecord {
            reference: reference.clone(),
            received_at,
            form,
        };
        let mut line =
            serde_json::to_string(&record).map_err(|e| SubmissionError::Io(e.to_string()))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SubmissionError::Io(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SubmissionError::Io(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| SubmissionError::Io(e.to_string()))?;

        tracing::info!(
            event = "registration_accepted",
            sink = "file",
            reference = %reference,
            path = %self.path.display(),
            "Registration recorded"
        );
        Ok(Acknowledgement::new(reference))
    }
}

fn last_reference(line: &str) -> u64 {
    serde_json::from_str::<RegistrationRecord>(line)
        .ok()
        .and_then(|record| reference_number(&record.reference))
        .unwrap_or_default()
}

impl SubmissionSink for JsonlSink {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        self.append(form.clone())
    }
}

// =============================================================================
// WEBHOOK
// =============================================================================

/// Expected body of a successful webhook reply.
#[derive(Debug, Deserialize)]
struct WebhookReply {
    reference: String,
}

/// POSTs each registration as JSON to a fixed URL.
///
/// Status mapping:
/// - 2xx with `{"reference": "..."}` → accepted
/// - 401, 403 and other 4xx → `Rejected`
/// - 429, 5xx, connection failures → `Unavailable`
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl WebhookSink {
    #[must_use]
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }

    async fn post(&self, form: RegistrationForm) -> Result<Acknowledgement, SubmissionError> {
        let mut req = self.http.post(&self.url).json(&form);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(event = "webhook_unreachable", url = %self.url, "Webhook unreachable: {}", e);
            SubmissionError::Unavailable(format!("cannot reach {}", self.url))
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SubmissionError::Unavailable(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected(format!("{}: {}", status, body)));
        }

        let reply = resp
            .json::<WebhookReply>()
            .await
            .map_err(|e| SubmissionError::Rejected(format!("unreadable reply: {}", e)))?;
        tracing::info!(
            event = "registration_accepted",
            sink = "webhook",
            reference = %reply.reference,
            "Registration forwarded"
        );
        Ok(Acknowledgement::new(reply.reference))
    }
}

impl SubmissionSink for WebhookSink {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        self.post(form.clone())
    }
}

// =============================================================================
// TIMEOUT
// =============================================================================

/// Fails a submission with `TimedOut` when `inner` takes too long.
#[derive(Debug)]
pub struct TimeoutSink<S> {
    inner: S,
    timeout: Duration,
}

impl<S: SubmissionSink> TimeoutSink<S> {
    #[must_use]
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SubmissionSink> SubmissionSink for TimeoutSink<S> {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        let timeout = self.timeout;
        let pending = self.inner.submit(form);
        async move {
            match tokio::time::timeout(timeout, pending).await {
                Ok(result) => result,
                Err(_) => {
                    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(event = "submission_timeout", timeout_ms = ms, "Submission timed out");
                    Err(SubmissionError::TimedOut(ms))
                }
            }
        }
    }
}

// =============================================================================
// CONFIGURED
// =============================================================================

/// The sink selected by configuration.
#[derive(Debug)]
pub enum ConfiguredSink {
    Simulated(SimulatedSink),
    File(JsonlSink),
    Webhook(WebhookSink),
}

impl ConfiguredSink {
    /// Short name for logs and banners.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Simulated(s) => format!("simulated ({} ms delay)", s.delay.as_millis()),
            Self::File(s) => format!("file ({})", s.path().display()),
            Self::Webhook(s) => format!("webhook ({})", s.url),
        }
    }
}

impl SubmissionSink for ConfiguredSink {
    fn submit(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<Acknowledgement, SubmissionError>> + Send {
        async move {
            match self {
                Self::Simulated(sink) => sink.submit(form).await,
                Self::File(sink) => sink.submit(form).await,
                Self::Webhook(sink) => sink.submit(form).await,
            }
        }
    }
}

/// Build the sink described by `config`, wrapped in its timeout.
pub fn build_sink(config: &SubmissionConfig) -> Result<AppSink, AppError> {
    let sink = match config.kind {
        SinkKind::Simulated => {
            ConfiguredSink::Simulated(SimulatedSink::new(Duration::from_millis(config.delay_ms)))
        }
        SinkKind::File => ConfiguredSink::File(JsonlSink::open(&config.path)?),
        SinkKind::Webhook => {
            let url = config.url.clone().ok_or_else(|| {
                AppError::Config("submission.url is required for the webhook sink".to_string())
            })?;
            ConfiguredSink::Webhook(WebhookSink::new(url, config.token.clone()))
        }
    };
    Ok(TimeoutSink::new(
        sink,
        Duration::from_millis(config.timeout_ms),
    ))
}

// =============================================================================
// TESTS
// =============================================================================
