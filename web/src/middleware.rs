//! Request-tracking middleware.
//!
//! Every request gets a correlation id (taken from the `X-Correlation-ID`
//! header or freshly generated), a tracing span carrying it, and the same
//! id echoed on the response so clients can quote it when reporting
//! problems.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for the correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Middleware function: tag the request, span it, echo the id back.
///
/// Install with `axum::middleware::from_fn(correlation_id)`.
pub async fn correlation_id(request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
