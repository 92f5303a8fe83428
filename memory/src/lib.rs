//! # Tez Market Memory
//!
//! The in-memory storage backend: [`MemoryStore`] implements every
//! repository trait from `tezmarket-core` over `tokio::sync::RwLock`-guarded
//! maps with per-user secondary indexes.
//!
//! This is the shipped production store for the demo deployment - not a
//! test double. A relational backend can replace it by implementing the
//! same traits; nothing above the traits would change.
//!
//! Demo data is loaded by the explicit [`seed::seed_demo_data`] bootstrap
//! step, never as a construction side effect.

pub mod seed;
mod store;

pub use store::MemoryStore;
