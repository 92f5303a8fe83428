//! Order lifecycle state machine.
//!
//! Orders move along the linear path
//! `pending → preparing → delivering → delivered`, with `cancelled`
//! reachable from any non-terminal state. `delivered` and `cancelled` are
//! terminal: once reached, every further transition is rejected.
//!
//! Every real status change owes the order's owner exactly one
//! notification; the fixed templates live here next to the graph so the
//! wording and the rules stay in one place.

use crate::types::{NotificationKind, OrderId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an order in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation by the store.
    Pending,
    /// Being picked and packed.
    Preparing,
    /// Handed to a courier.
    Delivering,
    /// Delivered to the customer. Terminal.
    Delivered,
    /// Cancelled by the customer or an admin. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether `next` is a legal successor of this status.
    ///
    /// The legal graph is the linear delivery path plus cancellation edges
    /// from every non-terminal state. A status is never its own successor;
    /// callers decide whether a same-status request is a no-op or an error.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Preparing)
                | (Self::Preparing, Self::Delivering)
                | (Self::Delivering, Self::Delivered)
                | (
                    Self::Pending | Self::Preparing | Self::Delivering,
                    Self::Cancelled
                )
        )
    }

    /// The next status on the normal delivery path, if any.
    ///
    /// Used by the demo auto-advance timers.
    #[must_use]
    pub const fn auto_next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Delivering),
            Self::Delivering => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Error for an unrecognized status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// User-facing wording for a status change, ready for the notification feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Notification category; always [`NotificationKind::Order`].
    pub kind: NotificationKind,
}

/// Short human-facing order reference: the last six characters of the id.
#[must_use]
pub fn short_ref(order_id: &OrderId) -> &str {
    let id = order_id.as_str();
    let cut = id.len().saturating_sub(6);
    id.get(cut..).unwrap_or(id)
}

/// Renders the fixed notification template for an order reaching `status`.
///
/// The `Pending` entry is used once, when the order is created; the others
/// accompany the corresponding transition.
#[must_use]
pub fn status_message(status: OrderStatus, order_id: &OrderId) -> StatusMessage {
    let n = short_ref(order_id);
    let (title, message) = match status {
        OrderStatus::Pending => (
            "Заказ оформлен".to_string(),
            format!("Заказ №{n} принят в обработку"),
        ),
        OrderStatus::Preparing => (
            "Заказ готовится".to_string(),
            format!("Заказ №{n} принят в работу, мы уже собираем ваши продукты"),
        ),
        OrderStatus::Delivering => (
            "Курьер в пути".to_string(),
            format!("Заказ №{n} передан курьеру, ожидаемое время прибытия 5-8 минут"),
        ),
        OrderStatus::Delivered => (
            "Заказ доставлен".to_string(),
            format!("Заказ №{n} доставлен. Спасибо, что выбираете нас!"),
        ),
        OrderStatus::Cancelled => (
            "Заказ отменен".to_string(),
            format!("Заказ №{n} отменен"),
        ),
    };
    StatusMessage {
        title,
        message,
        kind: NotificationKind::Order,
    }
}
