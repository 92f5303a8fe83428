//! Checkout, order listing, and lifecycle endpoints (user and admin).

use crate::error::AppError;
use crate::extractors::CorrelationId;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tezmarket_core::types::{Order, OrderId, UserId};
use tezmarket_core::OrderStatus;
use tezmarket_runtime::CheckoutRequest;

/// Request body for `POST /api/orders`.
///
/// There is deliberately no total field: totals are computed server-side,
/// and any `totalAmount` a client smuggles into the JSON is ignored as an
/// unknown field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// The ordering user.
    pub user_id: String,
    /// Required delivery address.
    pub delivery_address: String,
    /// Courier comment.
    pub comment: Option<String>,
    /// Packer comment.
    pub packer_comment: Option<String>,
    /// Promo code as typed by the customer.
    pub promo_code: Option<String>,
}

/// Response for `POST /api/orders`: the order plus exclusion warnings.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    /// The persisted order with its authoritative total.
    #[serde(flatten)]
    pub order: Order,
    /// One entry per cart row excluded because its product was gone.
    pub warnings: Vec<String>,
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderCreated>), AppError> {
    if request.delivery_address.trim().is_empty() {
        return Err(AppError::bad_request("delivery address is required"));
    }

    let placed = state
        .checkout
        .place_order(CheckoutRequest {
            user_id: UserId::new(request.user_id),
            delivery_address: request.delivery_address,
            comment: request.comment,
            packer_comment: request.packer_comment,
            promo_code: request.promo_code,
        })
        .await?;

    tracing::info!(
        correlation_id = %correlation_id.0,
        order_id = %placed.order.id,
        total = %placed.order.total_amount,
        "checkout completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            order: placed.order,
            warnings: placed.warnings,
        }),
    ))
}

/// `GET /api/orders/:id` (id = user id) - the user's orders, newest first.
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(
        state.orders.list_for_user(UserId::new(user_id)).await?,
    ))
}

/// `PATCH /api/orders/:id/cancel` - user-facing cancellation.
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .lifecycle
        .transition(OrderId::new(id), OrderStatus::Cancelled)
        .await?;
    Ok(Json(order))
}

/// `GET /api/admin/orders` - every order, newest first.
pub async fn list_all_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list_all().await?))
}

/// Request body for the admin status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status, lowercase.
    pub status: String,
}

/// `PATCH /api/admin/orders/:id/status`
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let status: OrderStatus = request.status.parse()?;
    let order = state.lifecycle.transition(OrderId::new(id), status).await?;
    Ok(Json(order))
}

/// Request body for the bulk admin status change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusRequest {
    /// Orders to move.
    pub order_ids: Vec<String>,
    /// Target status, lowercase.
    pub status: String,
}

/// Response for the bulk admin status change.
#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    /// The orders that actually transitioned.
    pub updated: Vec<Order>,
}

/// `PATCH /api/admin/orders/status`
///
/// Partial-success semantics: orders that cannot transition are skipped,
/// never blocking the rest.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(request): Json<BulkStatusRequest>,
) -> Result<Json<BulkStatusResponse>, AppError> {
    let status: OrderStatus = request.status.parse()?;
    let updated = state
        .lifecycle
        .transition_many(
            request.order_ids.into_iter().map(OrderId::new).collect(),
            status,
        )
        .await;
    Ok(Json(BulkStatusResponse { updated }))
}
