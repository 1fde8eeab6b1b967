//! # API Endpoint Handlers
//!
//! This module implements the HTTP endpoint handlers.
//!
//! Every wizard endpoint answers with a [`WizardResponse`]. Rejections carry
//! the unchanged wizard so the front end can re-render without a second call.

use super::{
    AppState,
    registry::WizardId,
    types::{EventsResponse, HealthResponse, WizardResponse, WizardView, validate_updates},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use genaisis_core::{
    EventId, FieldUpdate, RegistrationWizard, SubmissionError, SubmissionSink, WizardError,
};

type Reply = (StatusCode, Json<WizardResponse>);

// =============================================================================
// RESPONSE HELPERS
// =============================================================================

/// HTTP status for a rejected wizard operation.
fn status_for(error: &WizardError) -> StatusCode {
    match error {
        WizardError::StepIncomplete { .. }
        | WizardError::NoNextStep
        | WizardError::NoPreviousStep
        | WizardError::NotOnFinalStep(_)
        | WizardError::SubmissionInFlight
        | WizardError::AlreadySubmitted
        | WizardError::NoSubmissionInFlight => StatusCode::CONFLICT,
        WizardError::UnknownEvent(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WizardError::SubmissionFailed(SubmissionError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
        WizardError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
        WizardError::InvalidCatalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn not_found(id: WizardId) -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(WizardResponse::error(format!("No registration {}", id))),
    )
}

fn respond<T>(id: WizardId, wizard: &RegistrationWizard, result: Result<T, WizardError>) -> Reply {
    let view = WizardView::new(id, wizard);
    match result {
        Ok(_) => (StatusCode::OK, Json(WizardResponse::success(view))),
        Err(error) => {
            tracing::debug!(wizard = %id, "Rejected: {}", error);
            let missing = match &error {
                WizardError::StepIncomplete { missing, .. } => missing.clone(),
                _ => vec![],
            };
            (
                status_for(&error),
                Json(WizardResponse::rejected(view, error.to_string(), missing)),
            )
        }
    }
}

/// Run `op` against wizard `id` under the write lock.
async fn with_wizard<T>(
    state: &AppState,
    id: WizardId,
    op: impl FnOnce(&mut RegistrationWizard) -> Result<T, WizardError>,
) -> Reply {
    let mut registry = state.registry.write().await;
    let Some(wizard) = registry.get_mut(id) else {
        return not_found(id);
    };
    let result = op(wizard);
    respond(id, wizard, result)
}

// =============================================================================
// HEALTH & CATALOG
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// List the event catalog.
pub async fn events_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(EventsResponse {
        events: state.catalog.iter().cloned().collect(),
    })
}

// =============================================================================
// SESSION LIFECYCLE
// =============================================================================

/// Start a new registration wizard.
pub async fn create_handler(State(state): State<AppState>) -> Reply {
    let mut registry = state.registry.write().await;
    match registry.create() {
        Some((id, wizard)) => {
            tracing::info!(event = "wizard_created", wizard = %id, "Registration started");
            (
                StatusCode::CREATED,
                Json(WizardResponse::success(WizardView::new(id, wizard))),
            )
        }
        None => {
            tracing::warn!(
                event = "wizard_capacity",
                active = registry.len(),
                "Too many open registrations"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(WizardResponse::error(
                    "Too many open registrations, try again later",
                )),
            )
        }
    }
}

/// Fetch a wizard.
pub async fn get_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Reply {
    let id = WizardId(id);
    let registry = state.registry.read().await;
    match registry.get(id) {
        Some(wizard) => (
            StatusCode::OK,
            Json(WizardResponse::success(WizardView::new(id, wizard))),
        ),
        None => not_found(id),
    }
}

/// Discard a wizard.
///
/// Refused with `409 Conflict` while a submission is in flight, so the
/// submitter always gets the sink's answer.
pub async fn delete_handler(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    let id = WizardId(id);
    let mut registry = state.registry.write().await;
    match registry.get(id) {
        None => StatusCode::NOT_FOUND,
        Some(wizard) if wizard.is_submitting() => {
            tracing::warn!(event = "discard_refused", wizard = %id, "Submission in flight");
            StatusCode::CONFLICT
        }
        Some(_) => {
            registry.remove(id);
            tracing::info!(event = "wizard_discarded", wizard = %id, "Registration discarded");
            StatusCode::NO_CONTENT
        }
    }
}

// =============================================================================
// EDITING
// =============================================================================

/// Apply a batch of field updates.
pub async fn fields_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(updates): Json<Vec<FieldUpdate>>,
) -> Reply {
    if let Err(e) = validate_updates(&updates) {
        return (
            StatusCode::BAD_REQUEST,
            Json(WizardResponse::error(format!("Invalid update: {}", e))),
        );
    }
    with_wizard(&state, WizardId(id), |wizard| wizard.set_fields(updates)).await
}

/// Select or deselect an event.
pub async fn toggle_handler(
    State(state): State<AppState>,
    Path((id, event_id)): Path<(u64, String)>,
) -> Reply {
    let event_id = EventId::new(event_id);
    with_wizard(&state, WizardId(id), |wizard| wizard.toggle_event(&event_id)).await
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Advance one step.
pub async fn next_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Reply {
    with_wizard(&state, WizardId(id), RegistrationWizard::next).await
}

/// Go back one step.
pub async fn prev_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Reply {
    with_wizard(&state, WizardId(id), RegistrationWizard::prev).await
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Submit a wizard to the configured sink.
///
/// The registry lock is released while the sink works. The sink call and the
/// bookkeeping after it run in their own task, so a client that disconnects
/// mid-submission cannot leave the wizard frozen.
pub async fn submit_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Reply {
    let id = WizardId(id);
    let form = {
        let mut registry = state.registry.write().await;
        let Some(wizard) = registry.get_mut(id) else {
            return not_found(id);
        };
        match wizard.begin_submission() {
            Ok(form) => form,
            Err(error) => return respond(id, wizard, Err::<(), _>(error)),
        }
    };
    tracing::info!(event = "submission_started", wizard = %id, "Submitting registration");

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let result = task_state.sink.submit(&form).await;

        let mut registry = task_state.registry.write().await;
        let wizard = registry.get_mut(id)?;
        let outcome = wizard.finish_submission(result);
        match &outcome {
            Ok(ack) => tracing::info!(
                event = "submission_completed",
                wizard = %id,
                reference = %ack.reference,
                "Registration submitted"
            ),
            Err(error) => tracing::warn!(
                event = "submission_failed",
                wizard = %id,
                "Registration failed: {}",
                error
            ),
        }
        Some(respond(id, wizard, outcome))
    });

    match task.await {
        Ok(Some(reply)) => reply,
        // Evicted while the sink was working.
        Ok(None) => not_found(id),
        Err(e) => {
            tracing::error!(event = "submission_task_failed", wizard = %id, "{}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WizardResponse::error("Submission task failed")),
            )
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
