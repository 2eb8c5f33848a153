//! HTTP handlers for notification endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::notification::{Notification, NotificationService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<i64>,
}

/// List notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let notifications = service.list_notifications(query.limit.unwrap_or(50)).await?;
    Ok(Json(notifications))
}

/// Count unread notifications
pub async fn unread_count(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let service = NotificationService::new(state.db);
    let count = service.unread_count().await?;
    Ok(Json(json!({ "unread": count })))
}

/// Mark one notification as read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = NotificationService::new(state.db);
    service.mark_read(notification_id).await?;
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

/// Mark every notification as read
pub async fn mark_all_read(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let service = NotificationService::new(state.db);
    let updated = service.mark_all_read().await?;
    Ok(Json(json!({ "updated": updated })))
}
