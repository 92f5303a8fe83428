//! # Tez Market Web
//!
//! Axum HTTP layer for the Tez Market grocery backend, implementing the
//! "functional core, imperative shell" split: handlers parse and validate
//! requests, call the `tezmarket-runtime` services, and map domain results
//! (and errors) onto HTTP.
//!
//! # Request flow
//!
//! 1. Request arrives, the correlation-id layer tags it and opens a span
//! 2. A typed DTO is deserialized and boundary-validated
//! 3. The handler calls a service or repository
//! 4. Domain errors convert to [`AppError`] with a machine-stable code
//! 5. The response DTO serializes (money as 2-dp decimal strings)

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::ServerConfig;
pub use error::AppError;
pub use extractors::CorrelationId;
pub use routes::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
