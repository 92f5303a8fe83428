//! Cart endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tezmarket_core::types::{CartItem, CartItemId, Product, ProductId, UserId};
use tezmarket_runtime::CartUpdate;

/// Request body for `POST /api/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// The owning user.
    pub user_id: String,
    /// The product to add.
    pub product_id: Option<String>,
    /// Quantity 1..=99, default 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// One resolved cart row: the item plus its product, the way the
/// storefront renders it.
#[derive(Debug, Serialize)]
pub struct CartRow {
    /// The cart row.
    #[serde(flatten)]
    pub item: CartItem,
    /// The resolved product.
    pub product: Product,
}

/// `POST /api/cart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItem>), AppError> {
    let item = state
        .cart
        .add(
            UserId::new(request.user_id),
            request.product_id.map(ProductId::new),
            request.quantity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/cart/:id` (id = user id)
///
/// Rows whose product no longer exists are omitted, never an error.
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CartRow>>, AppError> {
    let rows = state
        .cart
        .resolved_cart(UserId::new(user_id))
        .await?
        .into_iter()
        .map(|(item, product)| CartRow { item, product })
        .collect();
    Ok(Json(rows))
}

/// Request body for `PUT /api/cart/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity 0..=99; zero removes the row.
    pub quantity: u32,
}

/// `PUT /api/cart/:id`
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Response, AppError> {
    match state
        .cart
        .update_quantity(CartItemId::new(id.clone()), request.quantity)
        .await?
    {
        Some(CartUpdate::Updated(item)) => Ok(Json(item).into_response()),
        Some(CartUpdate::Removed) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(AppError::not_found("Cart item", id)),
    }
}

/// `DELETE /api/cart/:id`
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.cart.remove(CartItemId::new(id.clone())).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Cart item", id))
    }
}

/// `DELETE /api/cart/user/:id` (id = user id)
///
/// Clearing an already-empty cart succeeds; the operation is idempotent.
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.cart.clear(UserId::new(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
