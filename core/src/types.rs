//! Core domain types for the Tez Market backend.
//!
//! Identifiers are display-able `String` newtypes so they can travel through
//! JSON and log output unchanged. Monetary amounts are fixed-point integer
//! cents ([`Money`]) and only become decimal strings at the serialization
//! boundary.

use crate::error::ParseMoneyError;
use crate::lifecycle::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw string identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user. Identity resolution (auth) happens
    /// outside this system; we treat the id as opaque.
    UserId
);
id_type!(
    /// Unique identifier for a catalog product.
    ProductId
);
id_type!(
    /// Unique identifier for a catalog category.
    CategoryId
);
id_type!(
    /// Unique identifier for a cart row.
    CartItemId
);
id_type!(
    /// Unique identifier for an order.
    OrderId
);
id_type!(
    /// Unique identifier for a notification.
    NotificationId
);

/// Money amount in integer cents.
///
/// Parsed from decimal strings such as `"89.00"` and serialized back with
/// exactly two fraction digits. All arithmetic stays in integer cents so a
/// large cart cannot accumulate floating-point drift.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiplies a unit price by a quantity.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }

    /// Applies a percentage discount, rounding half-up to the nearest cent.
    ///
    /// Percentages above 100 are treated as 100 (a free order).
    #[must_use]
    pub const fn apply_discount(self, percent: u8) -> Self {
        let keep = if percent >= 100 { 0 } else { 100 - percent as i64 };
        Self((self.0 * keep + 50) / 100)
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseMoneyError::Negative(s.to_string()));
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if frac.len() > 2 {
            return Err(ParseMoneyError::TooManyFractionDigits(s.to_string()));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| ParseMoneyError::Invalid(s.to_string()))?;
        let frac_cents: i64 = if frac.is_empty() {
            0
        } else {
            let parsed: i64 = frac
                .parse()
                .map_err(|_| ParseMoneyError::Invalid(s.to_string()))?;
            if frac.len() == 1 { parsed * 10 } else { parsed }
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Self)
            .ok_or_else(|| ParseMoneyError::Invalid(s.to_string()))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A catalog product.
///
/// Read-mostly; mutated only by explicit admin updates. The price is fixed
/// at catalog level - orders snapshot their total at creation and never
/// follow later price changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Display weight/volume, e.g. "500г".
    pub weight: Option<String>,
    /// Catalog image.
    pub image_url: Option<String>,
    /// Owning category, if any.
    pub category_id: Option<CategoryId>,
    /// Whether the product can currently be ordered.
    pub in_stock: bool,
    /// Shown in the popular-products rail.
    pub is_popular: bool,
}

/// A catalog category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-stable slug, unique within the catalog.
    pub slug: String,
    /// Category image.
    pub image_url: Option<String>,
    /// Listing order, ascending.
    pub sort_order: i32,
}

/// One row of a user's cart: a desired (product, quantity) pair.
///
/// `product_id` is a weak reference - the product may have been deleted
/// since the row was created, and readers must tolerate that by skipping
/// the row rather than failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart row identifier.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced product; dangling references are tolerated.
    pub product_id: Option<ProductId>,
    /// Desired quantity, kept within 1..=99.
    pub quantity: u32,
}

/// A placed order.
///
/// `total_amount` is computed server-side at creation time and never
/// recomputed afterwards, even if catalog prices change - it is the audit
/// record of what the customer was charged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Owning user; an order cannot exist without one.
    pub user_id: UserId,
    /// Authoritative total, fixed at creation.
    pub total_amount: Money,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Free-text delivery address.
    pub delivery_address: String,
    /// Customer comment for the courier.
    pub comment: Option<String>,
    /// Customer comment for the packer.
    pub packer_comment: Option<String>,
    /// The promo code that was applied, stored for audit. The discount
    /// itself is already baked into `total_amount`.
    pub promo_code: Option<String>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

/// Category of a user-facing notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Informational message.
    Info,
    /// Positive confirmation.
    Success,
    /// Something needs the user's attention.
    Warning,
    /// Order lifecycle update.
    Order,
}

/// A one-way message to a user, appended by the system (never by the user).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Receiving user.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Notification category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the user has opened it.
    pub is_read: bool,
    /// Back-reference for UI deep-linking; not ownership.
    pub related_order_id: Option<OrderId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
