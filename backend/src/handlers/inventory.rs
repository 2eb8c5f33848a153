//! HTTP handlers for inventory item and stock adjustment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::activity::{ActivityLogService, StockMovement};
use crate::services::inventory::{
    AdjustStockInput, CreateItemInput, InventoryService, ItemView, ListItemsQuery, UpdateItemInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Create an inventory item
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item.into()))
}

/// List inventory items, optionally filtered by status
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(query).await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Get an inventory item
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item.into()))
}

/// Edit an inventory item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item.into()))
}

/// Delete an inventory item
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InventoryService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(json!({ "message": "Item deleted" })))
}

/// Adjust an item's stock by a signed quantity
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.adjust_stock(item_id, input).await?;
    Ok(Json(item.into()))
}

/// Deactivate an item
pub async fn deactivate_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.deactivate_item(item_id).await?;
    Ok(Json(item.into()))
}

/// Reactivate an item
pub async fn activate_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemView>> {
    let service = InventoryService::new(state.db);
    let item = service.activate_item(item_id).await?;
    Ok(Json(item.into()))
}

/// Active items classified as running low
pub async fn list_low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.find_low_stock_items().await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Active items at or below critical threshold
pub async fn list_critical_stock(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.find_critical_stock_items().await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Active items with no stock
pub async fn list_out_of_stock(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.find_out_of_stock_items().await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Active items expiring soon (default: within 7 days)
pub async fn list_expiring(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.find_expiring_items(query.days.unwrap_or(7)).await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Active items past their expiration date
pub async fn list_expired(State(state): State<AppState>) -> AppResult<Json<Vec<ItemView>>> {
    let service = InventoryService::new(state.db);
    let items = service.find_expired_items().await?;
    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// Recent stock movements for an item
pub async fn item_movements(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = ActivityLogService::new(state.db);
    let movements = service
        .recent_for_item(item_id, query.limit.unwrap_or(50))
        .await?;
    Ok(Json(movements))
}
