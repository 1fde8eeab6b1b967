//! # Middleware Module
//!
//! Request guards for the registration API.
//!
//! - Rate limiting: one global token bucket (`server.rate_limit` requests per
//!   second, 0 disables)
//! - Authentication: optional bearer token (`GENAISIS_API_KEY`); `/health`
//!   stays open for load balancers
//!
//! Both read their settings once, when the router is built.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Paths reachable without a token.
const OPEN_PATHS: [&str; 1] = ["/health"];

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a limiter allowing `requests_per_second`, or `None` when 0.
pub fn create_rate_limiter(requests_per_second: u32) -> Option<GlobalRateLimiter> {
    let rps = NonZeroU32::new(requests_per_second)?;
    Some(Arc::new(RateLimiter::direct(Quota::per_second(rps))))
}

/// Reject with 429 once the bucket is empty.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if limiter.check().is_err() {
        tracing::warn!(
            event = "rate_limited",
            path = %request.uri().path(),
            "Rate limit exceeded"
        );
        return Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"));
    }
    Ok(next.run(request).await)
}

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// The expected bearer token.
pub type ApiKey = Arc<str>;

/// Compare two keys in time independent of where they differ.
///
/// Both sides are padded to the same length first so the comparison also
/// does not leak the expected key's length.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let len = provided.len().max(expected.len());
    let mut a = vec![0u8; len];
    let mut b = vec![0u8; len];
    a[..provided.len()].copy_from_slice(provided);
    b[..expected.len()].copy_from_slice(expected);

    let same_bytes: bool = a.ct_eq(&b).into();
    same_bytes && provided.len() == expected.len()
}

/// Require `Authorization: Bearer <key>` on every path but [`OPEN_PATHS`].
///
/// A raw `<key>` without the `Bearer ` prefix is accepted too.
pub async fn api_key_auth_middleware(
    State(expected): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if OPEN_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let rejection = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => {
            let key = value.strip_prefix("Bearer ").unwrap_or(value);
            (!keys_match(key, &expected)).then_some("invalid_api_key")
        }
        None => Some("missing_authorization_header"),
    };

    match rejection {
        None => Ok(next.run(request).await),
        Some(reason) => {
            tracing::warn!(
                event = "auth_failure",
                reason,
                path = %request.uri().path(),
                "Authentication failed"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
