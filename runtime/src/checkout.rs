//! Checkout: the cart → order pricing pipeline.
//!
//! The one invariant that matters most in this system lives here: the
//! total a customer is charged is recomputed from the server-side cart and
//! catalog on every checkout. A client-submitted total is never read.

use crate::auto_advance::AutoAdvance;
use crate::keyed_lock::KeyedMutex;
use crate::lifecycle::LifecycleService;
use std::sync::Arc;
use tezmarket_core::environment::Clock;
use tezmarket_core::error::MarketError;
use tezmarket_core::lifecycle::status_message;
use tezmarket_core::pricing::{quote_cart, total_with_promo};
use tezmarket_core::promo::PromoRegistry;
use tezmarket_core::repository::{
    CartRepository, NewNotification, NewOrder, NotificationRepository, OrderRepository,
    ProductRepository,
};
use tezmarket_core::types::{Order, UserId};
use tezmarket_core::OrderStatus;

/// Input for placing an order. Note there is no total field - the engine
/// computes it.
#[derive(Clone, Debug)]
pub struct CheckoutRequest {
    /// The ordering user.
    pub user_id: UserId,
    /// Required delivery address (validated non-empty at the API boundary).
    pub delivery_address: String,
    /// Courier comment.
    pub comment: Option<String>,
    /// Packer comment.
    pub packer_comment: Option<String>,
    /// Promo code as typed by the customer.
    pub promo_code: Option<String>,
}

/// A successfully placed order plus anything the customer should know
/// about rows that were silently excluded.
#[derive(Clone, Debug)]
pub struct PlacedOrder {
    /// The persisted order with its authoritative total.
    pub order: Order,
    /// One entry per cart row excluded because its product was gone.
    pub warnings: Vec<String>,
}

/// The checkout pipeline.
pub struct CheckoutService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    notifications: Arc<dyn NotificationRepository>,
    promo: PromoRegistry,
    clock: Arc<dyn Clock>,
    /// Shared with `CartService`; see its docs.
    user_locks: Arc<KeyedMutex<UserId>>,
    auto_advance: Option<(Arc<AutoAdvance>, Arc<LifecycleService>)>,
}

impl CheckoutService {
    /// Creates the service over its dependencies.
    ///
    /// `user_locks` must be the same map the cart service uses. When
    /// `auto_advance` is set, every placed order is handed to the
    /// scheduler for the demo delivery walk.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        notifications: Arc<dyn NotificationRepository>,
        promo: PromoRegistry,
        clock: Arc<dyn Clock>,
        user_locks: Arc<KeyedMutex<UserId>>,
        auto_advance: Option<(Arc<AutoAdvance>, Arc<LifecycleService>)>,
    ) -> Self {
        Self {
            carts,
            products,
            orders,
            notifications,
            promo,
            clock,
            user_locks,
            auto_advance,
        }
    }

    /// Places an order from the user's current cart.
    ///
    /// Runs under the user's checkout lock: read cart → resolve products →
    /// price → persist → clear cart, with no window for a concurrent
    /// checkout or cart edit from the same user to interleave.
    ///
    /// # Errors
    ///
    /// - [`MarketError::EmptyCart`] when nothing in the cart is priceable
    /// - storage failures
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<PlacedOrder, MarketError> {
        let _guard = self.user_locks.lock(request.user_id.clone()).await;

        let items = self.carts.items_for_user(request.user_id.clone()).await?;
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let product = match item.product_id.clone() {
                Some(product_id) => self.products.find(product_id).await?,
                None => None,
            };
            entries.push((item, product));
        }

        let quote = quote_cart(entries);
        if quote.is_empty() {
            return Err(MarketError::EmptyCart(request.user_id));
        }

        // Only a resolved, active code counts as applied; the stored audit
        // string is the registry's canonical spelling.
        let promo = request
            .promo_code
            .as_deref()
            .and_then(|code| self.promo.resolve(code));
        let total = total_with_promo(quote.subtotal, promo);

        let now = self.clock.now();
        let order = self
            .orders
            .insert(NewOrder {
                user_id: request.user_id.clone(),
                total_amount: total,
                status: OrderStatus::Pending,
                delivery_address: request.delivery_address,
                comment: request.comment,
                packer_comment: request.packer_comment,
                promo_code: promo.map(|p| p.code.clone()),
                created_at: now,
            })
            .await?;

        self.carts.clear_user(request.user_id.clone()).await?;

        let placed = status_message(OrderStatus::Pending, &order.id);
        if let Err(error) = self
            .notifications
            .insert(NewNotification {
                user_id: order.user_id.clone(),
                title: placed.title,
                message: placed.message,
                kind: placed.kind,
                related_order_id: Some(order.id.clone()),
                created_at: now,
            })
            .await
        {
            tracing::warn!(order_id = %order.id, %error, "order-placed notification failed");
        }

        if let Some((scheduler, lifecycle)) = &self.auto_advance {
            scheduler.schedule(Arc::clone(lifecycle), order.id.clone());
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = %order.total_amount,
            skipped = quote.skipped.len(),
            "order placed"
        );
        metrics::counter!("orders.placed").increment(1);

        let warnings = quote
            .skipped
            .iter()
            .map(|id| format!("cart item {id} is no longer available and was excluded"))
            .collect();
        Ok(PlacedOrder { order, warnings })
    }
}
