//! Environment-based server configuration.

use std::time::Duration;
use tezmarket_runtime::AutoAdvanceDelays;

/// Server configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:3000`.
    pub bind_addr: String,
    /// Whether to load the demo catalog at startup.
    pub seed_demo: bool,
    /// Demo auto-advance delays; `None` disables the timers.
    pub auto_advance: Option<AutoAdvanceDelays>,
}

impl ServerConfig {
    /// Reads configuration from the environment.
    ///
    /// - `TEZMARKET_ADDR` - bind address (default `0.0.0.0:3000`)
    /// - `TEZMARKET_SEED` - `0`/`false` skips demo seeding (default on)
    /// - `TEZMARKET_AUTO_ADVANCE_SECS` - three comma-separated offsets in
    ///   seconds for the demo delivery walk (default `60,180,300`); `0`
    ///   disables the timers entirely
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("TEZMARKET_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let seed_demo = std::env::var("TEZMARKET_SEED")
            .map(|v| !matches!(v.trim(), "0" | "false" | "off"))
            .unwrap_or(true);
        let auto_advance = match std::env::var("TEZMARKET_AUTO_ADVANCE_SECS") {
            Ok(raw) => parse_auto_advance(&raw),
            Err(_) => Some(AutoAdvanceDelays::default()),
        };

        Self {
            bind_addr,
            seed_demo,
            auto_advance,
        }
    }
}

fn parse_auto_advance(raw: &str) -> Option<AutoAdvanceDelays> {
    let raw = raw.trim();
    if matches!(raw, "0" | "off" | "false") {
        return None;
    }
    let parts: Option<Vec<u64>> = raw.split(',').map(|p| p.trim().parse().ok()).collect();
    match parts.as_deref() {
        Some([to_preparing, to_delivering, to_delivered]) => Some(AutoAdvanceDelays {
            to_preparing: Duration::from_secs(*to_preparing),
            to_delivering: Duration::from_secs(*to_delivering),
            to_delivered: Duration::from_secs(*to_delivered),
        }),
        _ => {
            tracing::warn!(%raw, "TEZMARKET_AUTO_ADVANCE_SECS wants three offsets in seconds, using defaults");
            Some(AutoAdvanceDelays::default())
        },
    }
}
