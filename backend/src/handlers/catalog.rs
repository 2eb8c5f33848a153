//! HTTP handlers for category and unit-of-measure endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::catalog::{
    CatalogService, CategoryInput, InventoryCategory, UnitInput, UnitOfMeasure,
};
use crate::AppState;

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<InventoryCategory>> {
    let service = CatalogService::new(state.db);
    let category = service.create_category(input).await?;
    Ok(Json(category))
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryCategory>>> {
    let service = CatalogService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Get a category
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<InventoryCategory>> {
    let service = CatalogService::new(state.db);
    let category = service.get_category(category_id).await?;
    Ok(Json(category))
}

/// Rename a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<InventoryCategory>> {
    let service = CatalogService::new(state.db);
    let category = service.update_category(category_id, input).await?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_category(category_id).await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}

/// Create a unit of measure
pub async fn create_unit(
    State(state): State<AppState>,
    Json(input): Json<UnitInput>,
) -> AppResult<Json<UnitOfMeasure>> {
    let service = CatalogService::new(state.db);
    let unit = service.create_unit(input).await?;
    Ok(Json(unit))
}

/// List all units of measure
pub async fn list_units(State(state): State<AppState>) -> AppResult<Json<Vec<UnitOfMeasure>>> {
    let service = CatalogService::new(state.db);
    let units = service.list_units().await?;
    Ok(Json(units))
}

/// Edit a unit of measure
pub async fn update_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<UnitInput>,
) -> AppResult<Json<UnitOfMeasure>> {
    let service = CatalogService::new(state.db);
    let unit = service.update_unit(unit_id, input).await?;
    Ok(Json(unit))
}

/// Delete a unit of measure
pub async fn delete_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_unit(unit_id).await?;
    Ok(Json(json!({ "message": "Unit deleted" })))
}
