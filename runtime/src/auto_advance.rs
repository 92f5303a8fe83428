//! Demo auto-advance timers.
//!
//! Each freshly placed order gets one background task that walks it along
//! `pending → preparing → delivering → delivered` on configured delays,
//! anchored at creation time. Every step re-checks the order's current
//! status through [`LifecycleService::apply_scheduled`], so an admin
//! action or a cancellation supersedes the timer instead of being
//! overwritten by it. Terminal transitions abort the task outright.

use crate::lifecycle::{LifecycleService, ScheduledOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tezmarket_core::types::OrderId;
use tezmarket_core::OrderStatus;
use tokio::task::JoinHandle;

/// Offsets from order creation at which each auto step fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AutoAdvanceDelays {
    /// Creation → preparing.
    pub to_preparing: Duration,
    /// Creation → delivering.
    pub to_delivering: Duration,
    /// Creation → delivered.
    pub to_delivered: Duration,
}

impl Default for AutoAdvanceDelays {
    fn default() -> Self {
        Self {
            to_preparing: Duration::from_secs(60),
            to_delivering: Duration::from_secs(180),
            to_delivered: Duration::from_secs(300),
        }
    }
}

/// Registry of per-order auto-advance tasks.
pub struct AutoAdvance {
    delays: AutoAdvanceDelays,
    tasks: Mutex<HashMap<OrderId, JoinHandle<()>>>,
}

impl AutoAdvance {
    /// Creates a registry with the given step delays.
    #[must_use]
    pub fn new(delays: AutoAdvanceDelays) -> Arc<Self> {
        Arc::new(Self {
            delays,
            tasks: Mutex::new(HashMap::new()),
        })
    }

    /// Starts the timer chain for a freshly placed order.
    ///
    /// Scheduling twice for the same order replaces (and aborts) the
    /// earlier chain.
    pub fn schedule(self: &Arc<Self>, lifecycle: Arc<LifecycleService>, order_id: OrderId) {
        let registry = Arc::clone(self);
        let chain_order_id = order_id.clone();
        let delays = self.delays;

        let handle = tokio::spawn(async move {
            let steps = [
                (delays.to_preparing, OrderStatus::Pending, OrderStatus::Preparing),
                (delays.to_delivering, OrderStatus::Preparing, OrderStatus::Delivering),
                (delays.to_delivered, OrderStatus::Delivering, OrderStatus::Delivered),
            ];
            let mut elapsed = Duration::ZERO;
            for (at, from, to) in steps {
                tokio::time::sleep(at.saturating_sub(elapsed)).await;
                elapsed = at;
                match lifecycle.apply_scheduled(&chain_order_id, from, to).await {
                    ScheduledOutcome::Applied | ScheduledOutcome::Superseded => {},
                    ScheduledOutcome::Finished => break,
                }
            }
            registry.forget(&chain_order_id);
        });

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = tasks.insert(order_id, handle) {
            previous.abort();
        }
    }

    /// Deactivates any still-pending chain for an order.
    ///
    /// Called whenever the order reaches a terminal state; calling it for
    /// an order without a chain is fine.
    pub fn cancel(&self, order_id: &OrderId) {
        let handle = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.remove(order_id)
        };
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!(%order_id, "auto-advance chain cancelled");
        }
    }

    /// Whether an order currently has a live chain. Test observability.
    #[must_use]
    pub fn is_scheduled(&self, order_id: &OrderId) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(order_id)
    }

    fn forget(&self, order_id: &OrderId) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(order_id);
    }
}
