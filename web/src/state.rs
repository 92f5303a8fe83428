//! Application state shared across handlers.

use std::sync::Arc;
use tezmarket_core::environment::Clock;
use tezmarket_core::promo::PromoRegistry;
use tezmarket_core::repository::{
    CartRepository, CategoryRepository, NotificationRepository, OrderRepository, ProductRepository,
};
use tezmarket_memory::MemoryStore;
use tezmarket_runtime::{
    AutoAdvance, AutoAdvanceDelays, CartService, CheckoutService, KeyedMutex, LifecycleService,
};

/// Everything the handlers need: services for the invariant-bearing flows,
/// repositories for the plain reads, and the clock for system-created
/// records.
#[derive(Clone)]
pub struct AppState {
    /// Cart mutations and the resolved cart read.
    pub cart: Arc<CartService>,
    /// The checkout pricing pipeline.
    pub checkout: Arc<CheckoutService>,
    /// The order status state machine.
    pub lifecycle: Arc<LifecycleService>,
    /// Catalog product reads.
    pub products: Arc<dyn ProductRepository>,
    /// Catalog category reads.
    pub categories: Arc<dyn CategoryRepository>,
    /// Order listing.
    pub orders: Arc<dyn OrderRepository>,
    /// Notification feed access.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Clock for records created at the HTTP boundary.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the full service graph over one shared [`MemoryStore`].
    ///
    /// `auto_advance` enables the demo timer chain with the given delays.
    #[must_use]
    pub fn with_store(
        store: Arc<MemoryStore>,
        promo: PromoRegistry,
        clock: Arc<dyn Clock>,
        auto_advance: Option<AutoAdvanceDelays>,
    ) -> Self {
        let scheduler = auto_advance.map(AutoAdvance::new);
        let user_locks = Arc::new(KeyedMutex::new());
        let carts: Arc<dyn CartRepository> = store.clone();
        let products: Arc<dyn ProductRepository> = store.clone();
        let orders: Arc<dyn OrderRepository> = store.clone();
        let notifications: Arc<dyn NotificationRepository> = store.clone();
        let lifecycle = Arc::new(LifecycleService::new(
            Arc::clone(&orders),
            Arc::clone(&notifications),
            Arc::clone(&clock),
            scheduler.clone(),
        ));
        let checkout = Arc::new(CheckoutService::new(
            Arc::clone(&carts),
            Arc::clone(&products),
            Arc::clone(&orders),
            Arc::clone(&notifications),
            promo,
            Arc::clone(&clock),
            Arc::clone(&user_locks),
            scheduler.map(|s| (s, Arc::clone(&lifecycle))),
        ));
        let cart = Arc::new(CartService::new(
            Arc::clone(&carts),
            Arc::clone(&products),
            user_locks,
        ));

        Self {
            cart,
            checkout,
            lifecycle,
            products: store.clone(),
            categories: store.clone(),
            orders: store.clone(),
            notifications: store.clone(),
            clock,
        }
    }
}
