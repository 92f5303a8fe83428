//! Notification feed endpoints.
//!
//! The feed itself is append-only and system-written; these endpoints let
//! the client read it, track the unread badge, and mark entries read. The
//! create endpoint exists for admin broadcasts.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tezmarket_core::repository::NewNotification;
use tezmarket_core::types::{Notification, NotificationId, NotificationKind, OrderId, UserId};

/// `GET /api/notifications/:id` (id = user id) - newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(
        state
            .notifications
            .list_for_user(UserId::new(user_id))
            .await?,
    ))
}

/// Response for the unread badge.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    /// Number of unread notifications.
    pub count: u64,
}

/// `GET /api/notifications/:id/count` (id = user id)
pub async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UnreadCount>, AppError> {
    let count = state
        .notifications
        .unread_count(UserId::new(user_id))
        .await?;
    Ok(Json(UnreadCount { count }))
}

/// Request body for the admin notification create.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    /// Receiving user.
    pub user_id: String,
    /// Short title, required non-empty.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Notification category, default `info`.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: NotificationKind,
    /// Optional order back-reference.
    pub related_order_id: Option<String>,
}

const fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

/// `POST /api/notifications`
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::bad_request("notification title is required"));
    }
    let notification = state
        .notifications
        .insert(NewNotification {
            user_id: UserId::new(request.user_id),
            title: request.title,
            message: request.message,
            kind: request.kind,
            related_order_id: request.related_order_id.map(OrderId::new),
            created_at: state.clock.now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// `PATCH /api/notifications/:id/read`
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    state
        .notifications
        .mark_read(NotificationId::new(id.clone()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Notification", id))
}

/// `PATCH /api/notifications/:id/read-all` (id = user id)
///
/// Succeeds even when nothing was unread; the operation is idempotent.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .notifications
        .mark_all_read(UserId::new(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
