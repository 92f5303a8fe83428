//! Health check endpoint.
//!
//! Used by load balancers for basic liveness; it deliberately checks no
//! dependencies.

use axum::http::StatusCode;

/// `GET /health`
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
