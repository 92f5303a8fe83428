//! # Tez Market Runtime
//!
//! The imperative shell around `tezmarket-core`: services that coordinate
//! repositories, the clock, and timers to run the cart → order pipeline and
//! the order lifecycle.
//!
//! ## Components
//!
//! - [`CartService`]: cart mutations with boundary validation and the
//!   defensive resolved-cart read
//! - [`CheckoutService`]: the authoritative pricing pipeline - read cart,
//!   price server-side, persist the order, clear the cart - under a
//!   per-user lock
//! - [`LifecycleService`]: the order status state machine with
//!   exactly-one-notification-per-real-change semantics, under a per-order
//!   lock
//! - [`AutoAdvance`]: cancellable per-order timers that walk demo orders
//!   along the delivery path
//!
//! Concurrency model: repositories serialize individual operations; these
//! services add the cross-operation mutual exclusion the domain needs
//! (two checkouts for one user must not both read the same cart; two
//! transitions for one order must not interleave).

mod auto_advance;
mod cart;
mod checkout;
mod keyed_lock;
mod lifecycle;

pub use auto_advance::{AutoAdvance, AutoAdvanceDelays};
pub use cart::{CartService, CartUpdate};
pub use checkout::{CheckoutRequest, CheckoutService, PlacedOrder};
pub use keyed_lock::KeyedMutex;
pub use lifecycle::LifecycleService;
