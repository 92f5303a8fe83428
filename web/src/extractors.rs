//! Custom Axum extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Extracts the id from the `X-Correlation-ID` header, or generates a new
/// UUID v4 if the header is missing or malformed. The middleware layer
/// echoes the same id back on the response.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}
