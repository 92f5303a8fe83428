//! HTTP-level tests: the full router over the real services and the
//! in-memory store, driven through `axum-test`.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use tezmarket_core::environment::Clock;
use tezmarket_core::promo::PromoRegistry;
use tezmarket_core::repository::ProductRepository;
use tezmarket_core::types::Product;
use tezmarket_memory::MemoryStore;
use tezmarket_memory::seed::seed_demo_data;
use tezmarket_testing::{fixtures, test_clock};
use tezmarket_web::{AppState, router};

fn make_server() -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(test_clock());
    let state = AppState::with_store(
        Arc::clone(&store),
        PromoRegistry::with_default_codes(),
        clock,
        None,
    );
    let server = TestServer::new(router(state)).expect("router should build");
    (server, store)
}

async fn seed_product(store: &MemoryStore, name: &str, price: &str) -> Product {
    ProductRepository::insert(store, fixtures::product(name, price))
        .await
        .unwrap()
}

async fn add_to_cart(server: &TestServer, user: &str, product: &Product, quantity: u32) {
    let response = server
        .post("/api/cart")
        .json(&json!({
            "userId": user,
            "productId": product.id.as_str(),
            "quantity": quantity,
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);
}

#[tokio::test]
async fn health_answers_ok() {
    let (server, _) = make_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn checkout_ignores_client_supplied_totals() {
    let (server, store) = make_server();
    let bread = seed_product(&store, "Хлеб", "100.00").await;
    let milk = seed_product(&store, "Молоко", "50.00").await;
    add_to_cart(&server, "u1", &bread, 2).await;
    add_to_cart(&server, "u1", &milk, 1).await;

    // The client tries to name its own price and status; both are unknown
    // fields to the endpoint and change nothing.
    let response = server
        .post("/api/orders")
        .json(&json!({
            "userId": "u1",
            "deliveryAddress": "ул. Рудаки, 25",
            "promoCode": "ПЕРВЫЙ",
            "totalAmount": "1.00",
            "status": "delivered",
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["totalAmount"], "200.00");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["promoCode"], "ПЕРВЫЙ");
    assert_eq!(body["warnings"], json!([]));

    // The cart was cleared by the checkout.
    let cart: Value = server.get("/api/cart/u1").await.json();
    assert_eq!(cart, json!([]));

    // Exactly one order, listed for its owner.
    let orders: Value = server.get("/api/orders/u1").await.json();
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_requires_an_address_and_a_cart() {
    let (server, store) = make_server();

    let response = server
        .post("/api/orders")
        .json(&json!({"userId": "u1", "deliveryAddress": "  "}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/orders")
        .json(&json!({"userId": "u1", "deliveryAddress": "ул. Рудаки, 25"}))
        .await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "EMPTY_CART");

    // With something in the cart it goes through.
    let bread = seed_product(&store, "Хлеб", "89.00").await;
    add_to_cart(&server, "u1", &bread, 1).await;
    let response = server
        .post("/api/orders")
        .json(&json!({"userId": "u1", "deliveryAddress": "ул. Рудаки, 25"}))
        .await;
    response.assert_status(http::StatusCode::CREATED);
}

#[tokio::test]
async fn cart_quantity_boundaries_over_http() {
    let (server, store) = make_server();
    let bread = seed_product(&store, "Хлеб", "89.00").await;

    let response = server
        .post("/api/cart")
        .json(&json!({"userId": "u1", "productId": bread.id.as_str(), "quantity": 100}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_QUANTITY");

    add_to_cart(&server, "u1", &bread, 2).await;
    let cart: Value = server.get("/api/cart/u1").await.json();
    let item_id = cart[0]["id"].as_str().unwrap().to_string();

    // Adding the same product merged, not duplicated.
    add_to_cart(&server, "u1", &bread, 3).await;
    let cart: Value = server.get("/api/cart/u1").await.json();
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["quantity"], 5);

    // Out-of-range update is rejected.
    let response = server
        .put(&format!("/api/cart/{item_id}"))
        .json(&json!({"quantity": 100}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);

    // In-range update succeeds.
    let response = server
        .put(&format!("/api/cart/{item_id}"))
        .json(&json!({"quantity": 1}))
        .await;
    response.assert_status_ok();

    // Zero deletes.
    let response = server
        .put(&format!("/api/cart/{item_id}"))
        .json(&json!({"quantity": 0}))
        .await;
    response.assert_status(http::StatusCode::NO_CONTENT);
    let cart: Value = server.get("/api/cart/u1").await.json();
    assert_eq!(cart, json!([]));

    // Updating or deleting the vanished row 404s.
    let response = server
        .put(&format!("/api/cart/{item_id}"))
        .json(&json!({"quantity": 1}))
        .await;
    response.assert_status(http::StatusCode::NOT_FOUND);
    let response = server.delete(&format!("/api/cart/{item_id}")).await;
    response.assert_status(http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_cart_is_idempotent() {
    let (server, store) = make_server();
    let bread = seed_product(&store, "Хлеб", "89.00").await;
    add_to_cart(&server, "u1", &bread, 1).await;

    server
        .delete("/api/cart/user/u1")
        .await
        .assert_status(http::StatusCode::NO_CONTENT);
    // Second clear still succeeds.
    server
        .delete("/api/cart/user/u1")
        .await
        .assert_status(http::StatusCode::NO_CONTENT);
}

async fn place_order(server: &TestServer, store: &MemoryStore, user: &str) -> String {
    let bread = seed_product(store, "Хлеб", "89.00").await;
    add_to_cart(server, user, &bread, 1).await;
    let response = server
        .post("/api/orders")
        .json(&json!({"userId": user, "deliveryAddress": "ул. Рудаки, 25"}))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_lifecycle_over_http() {
    let (server, store) = make_server();
    let order_id = place_order(&server, &store, "u1").await;

    // Skipping a step conflicts and leaves the order alone.
    let response = server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "delivering"}))
        .await;
    response.assert_status(http::StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // Unknown status strings are a client error.
    let response = server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "shipped"}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);

    // The legal next step works.
    let response = server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "preparing"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "preparing");

    // Missing orders 404.
    let response = server
        .patch("/api/admin/orders/order-missing/status")
        .json(&json!({"status": "preparing"}))
        .await;
    response.assert_status(http::StatusCode::NOT_FOUND);

    // The admin listing sees the order.
    let all: Value = server.get("/api/admin/orders").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn user_cancel_over_http() {
    let (server, store) = make_server();
    let order_id = place_order(&server, &store, "u1").await;

    let response = server.patch(&format!("/api/orders/{order_id}/cancel")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "cancelled");

    // Cancelling again is a same-status retry: idempotent success.
    let response = server.patch(&format!("/api/orders/{order_id}/cancel")).await;
    response.assert_status_ok();

    // But moving a cancelled order anywhere else conflicts.
    let response = server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "preparing"}))
        .await;
    response.assert_status(http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn bulk_status_update_is_partial_success() {
    let (server, store) = make_server();
    let valid = place_order(&server, &store, "u1").await;
    let cancelled = place_order(&server, &store, "u2").await;
    server
        .patch(&format!("/api/orders/{cancelled}/cancel"))
        .await
        .assert_status_ok();

    let response = server
        .patch("/api/admin/orders/status")
        .json(&json!({
            "orderIds": [valid, "order-missing", cancelled],
            "status": "preparing",
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let updated = body["updated"].as_array().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["status"], "preparing");
}

#[tokio::test]
async fn notification_feed_tracks_order_progress() {
    let (server, store) = make_server();
    let order_id = place_order(&server, &store, "u1").await;

    let feed: Value = server.get("/api/notifications/u1").await.json();
    assert_eq!(feed.as_array().unwrap().len(), 1); // placed
    assert_eq!(feed[0]["type"], "order");
    assert_eq!(feed[0]["relatedOrderId"], order_id);

    server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "preparing"}))
        .await
        .assert_status_ok();

    let count: Value = server.get("/api/notifications/u1/count").await.json();
    assert_eq!(count["count"], 2);

    // Repeating the transition adds nothing.
    server
        .patch(&format!("/api/admin/orders/{order_id}/status"))
        .json(&json!({"status": "preparing"}))
        .await
        .assert_status_ok();
    let count: Value = server.get("/api/notifications/u1/count").await.json();
    assert_eq!(count["count"], 2);

    // Mark one read, then all.
    let feed: Value = server.get("/api/notifications/u1").await.json();
    let first = feed[0]["id"].as_str().unwrap().to_string();
    server
        .patch(&format!("/api/notifications/{first}/read"))
        .await
        .assert_status_ok();
    let count: Value = server.get("/api/notifications/u1/count").await.json();
    assert_eq!(count["count"], 1);

    server
        .patch("/api/notifications/u1/read-all")
        .await
        .assert_status(http::StatusCode::NO_CONTENT);
    let count: Value = server.get("/api/notifications/u1/count").await.json();
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn admin_can_broadcast_a_notification() {
    let (server, _) = make_server();

    let response = server
        .post("/api/notifications")
        .json(&json!({
            "userId": "u1",
            "title": "Акция",
            "message": "Скидки выходного дня на сладости",
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["type"], "info");
    assert_eq!(body["isRead"], false);

    let count: Value = server.get("/api/notifications/u1/count").await.json();
    assert_eq!(count["count"], 1);

    let response = server
        .post("/api/notifications")
        .json(&json!({"userId": "u1", "title": "  ", "message": "без заголовка"}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_reads_over_the_seeded_store() {
    let (server, store) = make_server();
    let clock = test_clock();
    seed_demo_data(&store, &clock).await.unwrap();

    let categories: Value = server.get("/api/categories").await.json();
    assert_eq!(categories.as_array().unwrap().len(), 10);
    assert_eq!(categories[0]["slug"], "vegetables");

    let products: Value = server.get("/api/products").await.json();
    assert_eq!(products.as_array().unwrap().len(), 4);

    let popular: Value = server.get("/api/products?popular=true").await.json();
    assert_eq!(popular.as_array().unwrap().len(), 4);

    let found: Value = server
        .get("/api/products")
        .add_query_param("search", "хлеб")
        .await
        .json();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["price"], "89.00");

    let category_id = categories[0]["id"].as_str().unwrap();
    let in_category: Value = server
        .get(&format!("/api/products?category={category_id}"))
        .await
        .json();
    assert_eq!(in_category.as_array().unwrap().len(), 1); // Яблоки Гала

    server
        .get("/api/products/product-missing")
        .await
        .assert_status(http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_product_create_validates_input() {
    let (server, _) = make_server();

    let response = server
        .post("/api/products")
        .json(&json!({"name": "Сыр", "price": "not-a-price"}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/products")
        .json(&json!({"name": "  ", "price": "100.00"}))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/products")
        .json(&json!({"name": "Сыр Российский", "price": "420.00"}))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["price"], "420.00");
    assert_eq!(body["inStock"], true);
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let (server, _) = make_server();
    let response = server.get("/health").await;
    assert!(response.headers().get("X-Correlation-ID").is_some());
}
