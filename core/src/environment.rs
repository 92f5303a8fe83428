//! Injected dependencies.
//!
//! External capabilities the domain logic needs are abstracted behind
//! traits and passed in by the caller, so tests can substitute
//! deterministic implementations.

use chrono::{DateTime, Utc};

/// Abstracts time so tests can pin it.
///
/// Production uses [`SystemClock`]; tests use the `FixedClock` from the
/// `tezmarket-testing` crate.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
