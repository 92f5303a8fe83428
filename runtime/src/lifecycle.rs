//! Order lifecycle service.
//!
//! Owns every status mutation in the system. Transitions run under a
//! per-order lock, are validated against the legal graph in
//! `tezmarket_core::lifecycle`, and emit exactly one notification per real
//! status change. The status write is the source of truth; a failed
//! notification append is logged and never rolls it back.

use crate::auto_advance::AutoAdvance;
use crate::keyed_lock::KeyedMutex;
use std::sync::Arc;
use tezmarket_core::environment::Clock;
use tezmarket_core::error::MarketError;
use tezmarket_core::lifecycle::status_message;
use tezmarket_core::repository::{NewNotification, NotificationRepository, OrderRepository};
use tezmarket_core::types::{Order, OrderId};
use tezmarket_core::OrderStatus;

/// Outcome of a scheduled (timer-driven) transition attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScheduledOutcome {
    /// The order was in the expected state and moved forward.
    Applied,
    /// The order moved on without us; the step quietly stands down.
    Superseded,
    /// The order is gone or terminal; the timer chain should stop.
    Finished,
}

/// The order status state machine, with notification side effects.
pub struct LifecycleService {
    orders: Arc<dyn OrderRepository>,
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
    scheduler: Option<Arc<AutoAdvance>>,
    order_locks: KeyedMutex<OrderId>,
}

impl LifecycleService {
    /// Creates the service over its dependencies.
    ///
    /// `scheduler` is the timer registry to deactivate when an order
    /// reaches a terminal state; pass `None` when auto-advance is off.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        notifications: Arc<dyn NotificationRepository>,
        clock: Arc<dyn Clock>,
        scheduler: Option<Arc<AutoAdvance>>,
    ) -> Self {
        Self {
            orders,
            notifications,
            clock,
            scheduler,
            order_locks: KeyedMutex::new(),
        }
    }

    /// Moves an order to `new_status`.
    ///
    /// A request for the status the order is already in is an idempotent
    /// no-op: it succeeds and emits nothing, so retried calls cannot
    /// double-notify. Every other edge outside the legal graph is rejected
    /// and leaves the order untouched.
    ///
    /// # Errors
    ///
    /// - [`MarketError::OrderNotFound`] if the order does not exist
    /// - [`MarketError::InvalidTransition`] for illegal edges, including
    ///   anything out of a terminal state
    pub async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, MarketError> {
        let _guard = self.order_locks.lock(order_id.clone()).await;

        let order = self
            .orders
            .find(order_id.clone())
            .await?
            .ok_or_else(|| MarketError::OrderNotFound(order_id.clone()))?;

        if order.status == new_status {
            tracing::debug!(%order_id, status = %new_status, "transition no-op, already in status");
            return Ok(order);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(MarketError::InvalidTransition {
                order_id,
                from: order.status,
                to: new_status,
            });
        }

        let updated = self
            .orders
            .set_status(order_id.clone(), new_status)
            .await?
            .ok_or_else(|| MarketError::OrderNotFound(order_id.clone()))?;

        if new_status.is_terminal() {
            if let Some(scheduler) = &self.scheduler {
                scheduler.cancel(&order_id);
            }
        }

        tracing::info!(%order_id, from = %order.status, to = %new_status, "order status changed");
        metrics::counter!("orders.transitions").increment(1);
        self.notify_status(&updated).await;
        Ok(updated)
    }

    /// Applies the same transition to many orders independently.
    ///
    /// Returns the orders that actually transitioned. A failure on one
    /// order is logged and does not block or roll back the others.
    pub async fn transition_many(
        &self,
        order_ids: Vec<OrderId>,
        new_status: OrderStatus,
    ) -> Vec<Order> {
        let mut updated = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            match self.transition(order_id.clone(), new_status).await {
                Ok(order) => updated.push(order),
                Err(error) => {
                    tracing::warn!(%order_id, %error, "bulk transition skipped an order");
                },
            }
        }
        updated
    }

    /// Timer-driven step: advance `order_id` from `from` to `to` only if
    /// it is still exactly there. Anything else is a quiet no-op - a stale
    /// timer must never overwrite a terminal or superseding state.
    pub(crate) async fn apply_scheduled(
        &self,
        order_id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> ScheduledOutcome {
        let _guard = self.order_locks.lock(order_id.clone()).await;

        let Ok(Some(order)) = self.orders.find(order_id.clone()).await else {
            return ScheduledOutcome::Finished;
        };
        if order.status.is_terminal() {
            return ScheduledOutcome::Finished;
        }
        if order.status != from || !from.can_transition_to(to) {
            tracing::debug!(%order_id, current = %order.status, "scheduled transition superseded");
            return ScheduledOutcome::Superseded;
        }

        let Ok(Some(updated)) = self.orders.set_status(order_id.clone(), to).await else {
            return ScheduledOutcome::Finished;
        };
        tracing::info!(%order_id, from = %from, to = %to, "order auto-advanced");
        metrics::counter!("orders.transitions").increment(1);
        self.notify_status(&updated).await;
        ScheduledOutcome::Applied
    }

    /// Appends the status notification for `order`'s current status.
    /// Best-effort: the status change stands even if this fails.
    async fn notify_status(&self, order: &Order) {
        let message = status_message(order.status, &order.id);
        let result = self
            .notifications
            .insert(NewNotification {
                user_id: order.user_id.clone(),
                title: message.title,
                message: message.message,
                kind: message.kind,
                related_order_id: Some(order.id.clone()),
                created_at: self.clock.now(),
            })
            .await;
        match result {
            Ok(_) => {
                metrics::counter!("notifications.emitted").increment(1);
            },
            Err(error) => {
                tracing::warn!(
                    order_id = %order.id,
                    %error,
                    "notification delivery failed, status change stands"
                );
            },
        }
    }
}
