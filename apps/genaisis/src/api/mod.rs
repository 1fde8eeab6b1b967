//! # GENAISIS HTTP API Module
//!
//! This module hosts registration wizards behind a JSON API using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /events` - The event catalog
//! - `POST /registrations` - Start a wizard
//! - `GET /registrations/{id}` - Current wizard state
//! - `DELETE /registrations/{id}` - Discard a wizard
//! - `PATCH /registrations/{id}/fields` - Apply field updates
//! - `POST /registrations/{id}/events/{event_id}/toggle` - Select or deselect an event
//! - `POST /registrations/{id}/next` - Advance one step
//! - `POST /registrations/{id}/prev` - Go back one step
//! - `POST /registrations/{id}/submit` - Submit to the configured sink
//!
//! ## Security Configuration
//!
//! Taken from [`ServerConfig`](crate::config::ServerConfig), which the
//! `GENAISIS_CORS_ORIGINS`, `GENAISIS_RATE_LIMIT` and `GENAISIS_API_KEY`
//! environment variables override.

mod handlers;
mod middleware;
mod registry;
mod types;

pub use handlers::{
    create_handler, delete_handler, events_handler, fields_handler, get_handler, health_handler,
    next_handler, prev_handler, submit_handler, toggle_handler,
};
pub use middleware::{ApiKey, create_rate_limiter, keys_match};
pub use registry::{WizardId, WizardRegistry};
pub use types::{
    EventsResponse, HealthResponse, MAX_UPDATES_PER_REQUEST, WizardResponse, WizardView,
    validate_updates,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::sinks::{AppSink, build_sink};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use genaisis_core::EventCatalog;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request bodies are small JSON documents.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Router-level settings, fixed when the router is built.
#[derive(Debug, Clone, Default)]
pub struct SecuritySettings {
    pub api_key: Option<ApiKey>,
    pub rate_limit: u32,
    pub cors_origins: Option<Vec<String>>,
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// Live wizard sessions.
    pub registry: Arc<RwLock<WizardRegistry>>,
    /// The catalog every wizard validates against.
    pub catalog: Arc<EventCatalog>,
    /// Where completed registrations go.
    pub sink: Arc<AppSink>,
    pub security: SecuritySettings,
}

impl AppState {
    /// Build the state described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let catalog = Arc::new(config.catalog()?);
        let sink = build_sink(&config.submission)?;
        let registry = WizardRegistry::new(
            Arc::clone(&catalog),
            config.wizard,
            config.server.max_active_wizards,
        );

        Ok(Self {
            registry: Arc::new(RwLock::new(registry)),
            catalog,
            sink: Arc::new(sink),
            security: SecuritySettings {
                api_key: config.api_key().map(Arc::from),
                rate_limit: config.server.rate_limit,
                cors_origins: config.server.cors_origins.clone(),
            },
        })
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `None`: localhost only
/// - `["*"]`: any origin
/// - otherwise: the listed origins; unparsable entries are skipped
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. Do not use this in production");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                cors_for(allowed)
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();
    cors_for(origins)
}

fn cors_for(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing
/// 2. CORS
/// 3. Body limit
/// 4. Rate limiting (if enabled)
/// 5. Authentication (if a key is configured)
pub fn create_router(state: AppState) -> Router {
    let security = state.security.clone();

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/events", get(handlers::events_handler))
        .route("/registrations", post(handlers::create_handler))
        .route(
            "/registrations/{id}",
            get(handlers::get_handler).delete(handlers::delete_handler),
        )
        .route("/registrations/{id}/fields", patch(handlers::fields_handler))
        .route(
            "/registrations/{id}/events/{event_id}/toggle",
            post(handlers::toggle_handler),
        )
        .route("/registrations/{id}/next", post(handlers::next_handler))
        .route("/registrations/{id}/prev", post(handlers::prev_handler))
        .route("/registrations/{id}/submit", post(handlers::submit_handler));

    match security.api_key {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                key,
                middleware::api_key_auth_middleware,
            ));
        }
        None => tracing::warn!(
            "API key authentication DISABLED. Set GENAISIS_API_KEY to require a bearer token"
        ),
    }

    match create_rate_limiter(security.rate_limit) {
        Some(limiter) => {
            tracing::info!(
                "Rate limiting enabled: {} requests/second",
                security.rate_limit
            );
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(security.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl-C.
pub async fn run_server(config: &AppConfig) -> Result<(), AppError> {
    let state = AppState::from_config(config)?;
    tracing::info!(
        events = state.catalog.len(),
        sink = %state.sink.inner().describe(),
        "Registration desk ready"
    );
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Server(format!("Bind failed on {}: {}", addr, e)))?;

    tracing::info!("GENAISIS HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

// =============================================================================
// TESTS
// =============================================================================
