//! HTTP handlers for product, recipe, and production endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::product::{CreateProductInput, Product, ProductService, UpdateProductInput};
use crate::services::production::{ProduceInput, ProductionResult, ProductionService};
use crate::services::recipe::{RecipeIngredient, RecipeIngredientInput, RecipeLine, RecipeService};
use crate::AppState;

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Edit a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = ProductService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Get a product's recipe, resolved to raw materials
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<RecipeLine>>> {
    let service = RecipeService::new(state.db);
    let lines = service.ingredients_for(product_id).await?;
    Ok(Json(lines))
}

/// Replace a product's recipe
pub async fn set_recipe(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(rows): Json<Vec<RecipeIngredientInput>>,
) -> AppResult<Json<Vec<RecipeIngredient>>> {
    let service = RecipeService::new(state.db);
    let stored = service.set_recipe(product_id, rows).await?;
    Ok(Json(stored))
}

/// How many units current raw-material stock can produce
pub async fn max_producible(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = RecipeService::new(state.db);
    let max = service.calculate_max_producible(product_id).await?;
    Ok(Json(json!({ "product_id": product_id, "max_producible": max })))
}

/// Run a production: deduct ingredients, increment finished stock
pub async fn produce(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ProduceInput>,
) -> AppResult<Json<ProductionResult>> {
    let service = ProductionService::new(state.db);
    let result = service.produce(product_id, input).await?;
    Ok(Json(result))
}
