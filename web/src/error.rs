//! Error types for web handlers.
//!
//! [`AppError`] bridges domain errors and HTTP responses: every error
//! carries a status, a machine-stable code the client can branch on, and a
//! human-readable message. Validation problems come back as 4xx, illegal
//! lifecycle transitions as 409, storage trouble as 503 - so a client can
//! tell "your request is wrong" apart from "we couldn't serve you, retry".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use tezmarket_core::error::{MarketError, StorageError};
use tezmarket_core::lifecycle::UnknownStatus;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to the client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Creates an error from its parts.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attaches an internal source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// 409 Conflict.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// 422 Unprocessable Entity.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// 503 Service Unavailable.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }

    /// Overrides the machine-stable error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                source = ?self.source,
                "request failed"
            );
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match &err {
            MarketError::InvalidQuantity(_) => {
                Self::bad_request(err.to_string()).with_code("INVALID_QUANTITY")
            },
            MarketError::EmptyCart(_) => Self::validation(err.to_string()).with_code("EMPTY_CART"),
            MarketError::OrderNotFound(id) => Self::not_found("Order", id),
            MarketError::InvalidTransition { .. } => {
                Self::conflict(err.to_string()).with_code("INVALID_TRANSITION")
            },
            MarketError::ParseMoney(_) => Self::bad_request(err.to_string()),
            MarketError::Storage(_) => {
                Self::unavailable("storage backend unavailable").with_source(err.into())
            },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::unavailable("storage backend unavailable").with_source(err.into())
    }
}

impl From<UnknownStatus> for AppError {
    fn from(err: UnknownStatus) -> Self {
        Self::bad_request(err.to_string()).with_code("UNKNOWN_STATUS")
    }
}
