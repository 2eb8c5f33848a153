//! Production service: atomic multi-ingredient stock deduction
//!
//! A production run deducts every recipe ingredient and increments the
//! finished product inside one transaction. If any deduction fails the
//! whole transaction rolls back and no ingredient is left partially
//! changed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{spawn_adjustment_effects, InventoryService, StockAdjustment};
use crate::services::product::{Product, ProductStatus};
use crate::services::recipe::RecipeService;

/// Production service for turning raw materials into finished goods
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
    recipes: RecipeService,
}

/// Input for a production run
#[derive(Debug, Deserialize)]
pub struct ProduceInput {
    pub quantity: i64,
    pub performed_by: Option<String>,
}

/// Raw material consumed by a production run
#[derive(Debug, Clone, Serialize)]
pub struct IngredientConsumption {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity_consumed: Decimal,
    pub stock_after: Decimal,
}

/// Outcome of a production run
#[derive(Debug, Clone, Serialize)]
pub struct ProductionResult {
    pub product: Product,
    pub quantity_produced: i64,
    pub consumed: Vec<IngredientConsumption>,
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool) -> Self {
        let recipes = RecipeService::new(db.clone());
        Self { db, recipes }
    }

    /// Produce `quantity` units of a product, deducting every recipe
    /// ingredient atomically and incrementing the finished-good stock.
    pub async fn produce(&self, product_id: Uuid, input: ProduceInput) -> AppResult<ProductionResult> {
        if input.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Production quantity must be positive".to_string(),
            });
        }
        let quantity = Decimal::from(input.quantity);

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category_id, price, current_stock, low_stock_threshold,
                   critical_stock_threshold, status, created_at, updated_at
            FROM products WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if product.status != ProductStatus::Active {
            return Err(AppError::InvalidState(format!(
                "Product '{}' is inactive",
                product.name
            )));
        }

        let lines = self.recipes.ingredients_for(product_id).await?;
        if lines.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Product '{}' has no recipe defined",
                product.name
            )));
        }

        // Pre-check projected sufficiency before mutating anything, reporting
        // the first bottleneck in recipe order
        for line in &lines {
            let required = line.quantity_needed * quantity;
            if line.item.current_stock < required {
                return Err(AppError::InsufficientStock(format!(
                    "{}: need {} but only {} in stock",
                    line.item.name, required, line.item.current_stock
                )));
            }
        }

        // Deduct through the stock adjustment engine, acquiring row locks in
        // ascending item-id order so overlapping productions cannot deadlock.
        // A concurrent deduction that slipped past the pre-check surfaces
        // here as InsufficientStock and rolls the whole transaction back.
        let mut ordered: Vec<(Uuid, Decimal)> = lines
            .iter()
            .map(|line| (line.item.id, line.quantity_needed * quantity))
            .collect();
        ordered.sort_by_key(|(item_id, _)| *item_id);

        let mut adjustments: Vec<StockAdjustment> = Vec::with_capacity(ordered.len());
        for (item_id, required) in ordered {
            let adjustment =
                InventoryService::apply_adjustment(&mut tx, item_id, -required, None, None).await?;
            adjustments.push(adjustment);
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET current_stock = current_stock + $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, name, category_id, price, current_stock, low_stock_threshold,
                      critical_stock_threshold, status, created_at, updated_at
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let reason = format!("production: {} x{}", product.name, input.quantity);
        let consumed = adjustments
            .iter()
            .map(|adjustment| IngredientConsumption {
                item_id: adjustment.item.id,
                item_name: adjustment.item.name.clone(),
                quantity_consumed: -adjustment.quantity_change(),
                stock_after: adjustment.item.current_stock,
            })
            .collect();
        for adjustment in adjustments {
            spawn_adjustment_effects(
                self.db.clone(),
                adjustment,
                reason.clone(),
                input.performed_by.clone(),
            );
        }

        tracing::info!(
            "Produced {} x{}; finished stock now {}",
            product.name,
            input.quantity,
            product.current_stock
        );

        Ok(ProductionResult {
            product,
            quantity_produced: input.quantity,
            consumed,
        })
    }
}
