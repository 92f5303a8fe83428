//! Tez Market HTTP API server.
//!
//! Boots tracing, builds the in-memory store, runs the explicit demo-data
//! seeding step, wires the service graph, and serves the router.
//!
//! # Configuration
//!
//! - `TEZMARKET_ADDR` - bind address (default `0.0.0.0:3000`)
//! - `TEZMARKET_SEED` - `0` skips demo data
//! - `TEZMARKET_AUTO_ADVANCE_SECS` - `60,180,300` demo delivery walk, `0` off
//! - `RUST_LOG` - tracing filter (default `info`)

use std::sync::Arc;
use tezmarket_core::environment::{Clock, SystemClock};
use tezmarket_core::promo::PromoRegistry;
use tezmarket_memory::{MemoryStore, seed::seed_demo_data};
use tezmarket_web::{AppState, ServerConfig, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if config.seed_demo {
        seed_demo_data(&store, clock.as_ref()).await?;
    }

    let state = AppState::with_store(
        store,
        PromoRegistry::with_default_codes(),
        clock,
        config.auto_advance,
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "tezmarket listening");
    axum::serve(listener, app).await?;

    Ok(())
}
