//! Route composition.

use crate::handlers::{cart, catalog, health, notifications, orders};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the full application router.
///
/// # Routes
///
/// Storefront:
/// - `GET /health`
/// - `GET /api/categories`
/// - `GET /api/products` (`?category=`, `?search=`, `?popular=true`)
/// - `GET /api/products/:id`
/// - `POST /api/products`
/// - `GET/POST/PUT/DELETE /api/cart…`
/// - `POST /api/orders`, `GET /api/orders/:id`, `PATCH /api/orders/:id/cancel`
/// - `GET/POST/PATCH /api/notifications…`
///
/// Admin:
/// - `GET /api/admin/orders`
/// - `PATCH /api/admin/orders/:id/status`
/// - `PATCH /api/admin/orders/status` (bulk)
#[must_use]
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/categories", get(catalog::list_categories))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route("/products/:id", get(catalog::get_product))
        .route("/cart", post(cart::add_to_cart))
        .route(
            "/cart/:id",
            get(cart::get_cart)
                .put(cart::update_quantity)
                .delete(cart::remove_item),
        )
        .route("/cart/user/:id", delete(cart::clear_cart))
        .route("/orders", post(orders::create_order))
        .route("/orders/:id", get(orders::list_user_orders))
        .route("/orders/:id/cancel", patch(orders::cancel_order))
        .route("/admin/orders", get(orders::list_all_orders))
        .route("/admin/orders/status", patch(orders::bulk_update_status))
        .route("/admin/orders/:id/status", patch(orders::update_order_status))
        .route(
            "/notifications",
            post(notifications::create_notification),
        )
        .route("/notifications/:id", get(notifications::list_notifications))
        .route("/notifications/:id/count", get(notifications::unread_count))
        .route("/notifications/:id/read", patch(notifications::mark_read))
        .route(
            "/notifications/:id/read-all",
            patch(notifications::mark_all_read),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(axum::middleware::from_fn(crate::middleware::correlation_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
