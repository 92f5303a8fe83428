//! Timer tests for the demo auto-advance chain, run under paused tokio
//! time so the configured delays elapse instantly and deterministically.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use std::sync::Arc;
use std::time::Duration;
use tezmarket_core::environment::Clock;
use tezmarket_core::promo::PromoRegistry;
use tezmarket_core::repository::{
    CartRepository, NotificationRepository, OrderRepository, ProductRepository,
};
use tezmarket_core::types::{Order, UserId};
use tezmarket_core::OrderStatus;
use tezmarket_memory::MemoryStore;
use tezmarket_runtime::{
    AutoAdvance, AutoAdvanceDelays, CartService, CheckoutRequest, CheckoutService, KeyedMutex,
    LifecycleService,
};
use tezmarket_testing::{fixtures, test_clock};

struct TimedEnv {
    store: Arc<MemoryStore>,
    checkout: CheckoutService,
    lifecycle: Arc<LifecycleService>,
    scheduler: Arc<AutoAdvance>,
}

fn delays() -> AutoAdvanceDelays {
    AutoAdvanceDelays {
        to_preparing: Duration::from_secs(60),
        to_delivering: Duration::from_secs(180),
        to_delivered: Duration::from_secs(300),
    }
}

fn build_env() -> TimedEnv {
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(test_clock());
    let scheduler = AutoAdvance::new(delays());
    let carts: Arc<dyn CartRepository> = store.clone();
    let products: Arc<dyn ProductRepository> = store.clone();
    let orders: Arc<dyn OrderRepository> = store.clone();
    let notifications: Arc<dyn NotificationRepository> = store.clone();
    let lifecycle = Arc::new(LifecycleService::new(
        Arc::clone(&orders),
        Arc::clone(&notifications),
        Arc::clone(&clock),
        Some(Arc::clone(&scheduler)),
    ));
    let checkout = CheckoutService::new(
        Arc::clone(&carts),
        Arc::clone(&products),
        Arc::clone(&orders),
        Arc::clone(&notifications),
        PromoRegistry::with_default_codes(),
        Arc::clone(&clock),
        Arc::new(KeyedMutex::new()),
        Some((Arc::clone(&scheduler), Arc::clone(&lifecycle))),
    );
    TimedEnv {
        store,
        checkout,
        lifecycle,
        scheduler,
    }
}

async fn place_demo_order(env: &TimedEnv) -> Order {
    let product = ProductRepository::insert(env.store.as_ref(), fixtures::product("Хлеб", "89.00"))
        .await
        .unwrap();
    let carts: Arc<dyn CartRepository> = env.store.clone();
    let products: Arc<dyn ProductRepository> = env.store.clone();
    let cart = CartService::new(
        carts,
        products,
        Arc::new(KeyedMutex::new()),
    );
    cart.add(UserId::new("u1"), Some(product.id), 1).await.unwrap();
    env.checkout
        .place_order(CheckoutRequest {
            user_id: UserId::new("u1"),
            delivery_address: "ул. Рудаки, 25".to_string(),
            comment: None,
            packer_comment: None,
            promo_code: None,
        })
        .await
        .unwrap()
        .order
}

async fn status_of(env: &TimedEnv, order: &Order) -> OrderStatus {
    OrderRepository::find(env.store.as_ref(), order.id.clone())
        .await
        .unwrap()
        .unwrap()
        .status
}

async fn notification_count(env: &TimedEnv) -> usize {
    NotificationRepository::list_for_user(env.store.as_ref(), UserId::new("u1"))
        .await
        .unwrap()
        .len()
}

/// Sleeping in paused mode auto-advances the clock once every task is
/// idle, letting earlier-deadline timers (the chain's) fire first.
async fn run_until(seconds: u64) {
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn untouched_order_walks_to_delivered() {
    let env = build_env();
    let order = place_demo_order(&env).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Pending);
    assert!(env.scheduler.is_scheduled(&order.id));
    assert_eq!(notification_count(&env).await, 1); // placed

    run_until(61).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Preparing);
    assert_eq!(notification_count(&env).await, 2);

    run_until(120).await; // past 180s total
    assert_eq!(status_of(&env, &order).await, OrderStatus::Delivering);
    assert_eq!(notification_count(&env).await, 3);

    run_until(125).await; // past 300s total
    assert_eq!(status_of(&env, &order).await, OrderStatus::Delivered);
    assert_eq!(notification_count(&env).await, 4);
    assert!(!env.scheduler.is_scheduled(&order.id));
}

#[tokio::test(start_paused = true)]
async fn cancelled_order_is_never_resurrected_by_a_timer() {
    let env = build_env();
    let order = place_demo_order(&env).await;

    env.lifecycle
        .transition(order.id.clone(), OrderStatus::Cancelled)
        .await
        .unwrap();
    assert!(!env.scheduler.is_scheduled(&order.id));
    assert_eq!(notification_count(&env).await, 2); // placed + cancelled

    run_until(301).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Cancelled);
    assert_eq!(notification_count(&env).await, 2);
}

#[tokio::test(start_paused = true)]
async fn admin_action_supersedes_the_stale_timer_step() {
    let env = build_env();
    let order = place_demo_order(&env).await;

    // Admin moves the order forward before the first timer fires.
    env.lifecycle
        .transition(order.id.clone(), OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(notification_count(&env).await, 2); // placed + preparing

    // The 60s step finds the order already in `preparing` and stands down
    // without a duplicate notification.
    run_until(61).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Preparing);
    assert_eq!(notification_count(&env).await, 2);

    // Later steps still apply from where the order actually is.
    run_until(120).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Delivering);
    assert_eq!(notification_count(&env).await, 3);

    run_until(125).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Delivered);
    assert_eq!(notification_count(&env).await, 4);
}

#[tokio::test(start_paused = true)]
async fn late_cancel_stops_the_remaining_chain() {
    let env = build_env();
    let order = place_demo_order(&env).await;

    run_until(61).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Preparing);

    env.lifecycle
        .transition(order.id.clone(), OrderStatus::Cancelled)
        .await
        .unwrap();
    assert!(!env.scheduler.is_scheduled(&order.id));
    let before = notification_count(&env).await;

    run_until(300).await;
    assert_eq!(status_of(&env, &order).await, OrderStatus::Cancelled);
    assert_eq!(notification_count(&env).await, before);
}
