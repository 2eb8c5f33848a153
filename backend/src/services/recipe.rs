//! Recipe service: the Bill of Materials linking products to raw materials

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::max_producible;
use crate::services::inventory::{InventoryItem, ItemStatus};
use shared::validation;

/// Recipe service for resolving and defining bills of materials
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

/// One resolved recipe line: the raw material plus how much of it one unit
/// of the product consumes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeLine {
    pub quantity_needed: Decimal,
    #[sqlx(flatten)]
    pub item: InventoryItem,
}

/// One stored recipe row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub product_id: Uuid,
    pub inventory_item_id: Uuid,
    pub quantity_needed: Decimal,
}

/// Input row for defining a product's recipe
#[derive(Debug, Deserialize)]
pub struct RecipeIngredientInput {
    pub inventory_item_id: Uuid,
    pub quantity_needed: Decimal,
}

impl RecipeService {
    /// Create a new RecipeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve a product's recipe to its raw materials, ordered by
    /// ingredient name
    pub async fn ingredients_for(&self, product_id: Uuid) -> AppResult<Vec<RecipeLine>> {
        self.ensure_product_exists(product_id).await?;

        let lines = sqlx::query_as::<_, RecipeLine>(
            r#"
            SELECT ri.quantity_needed,
                   i.id, i.name, i.category_id, i.unit_id, i.current_stock,
                   i.low_stock_threshold, i.critical_stock_threshold, i.cost_per_unit,
                   i.status, i.received_date, i.expiration_days, i.expiration_date,
                   i.created_at, i.last_updated
            FROM recipe_ingredients ri
            JOIN inventory_items i ON i.id = ri.inventory_item_id
            WHERE ri.product_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lines)
    }

    /// Replace a product's recipe with the given rows.
    ///
    /// An empty list clears the recipe, which also makes the product
    /// unproducible until a new recipe is defined.
    pub async fn set_recipe(
        &self,
        product_id: Uuid,
        rows: Vec<RecipeIngredientInput>,
    ) -> AppResult<Vec<RecipeIngredient>> {
        self.ensure_product_exists(product_id).await?;

        let mut seen = std::collections::HashSet::new();
        for row in &rows {
            validation::validate_positive_quantity(row.quantity_needed).map_err(|msg| {
                AppError::Validation {
                    field: "quantity_needed".to_string(),
                    message: msg.to_string(),
                }
            })?;
            if !seen.insert(row.inventory_item_id) {
                return Err(AppError::Validation {
                    field: "inventory_item_id".to_string(),
                    message: "An ingredient appears more than once in the recipe".to_string(),
                });
            }
        }

        let mut tx = self.db.begin().await?;

        // Recipe rows may only reference active raw materials
        for row in &rows {
            let status = sqlx::query_scalar::<_, ItemStatus>(
                "SELECT status FROM inventory_items WHERE id = $1",
            )
            .bind(row.inventory_item_id)
            .fetch_optional(&mut *tx)
            .await?;

            match status {
                None => return Err(AppError::NotFound("Inventory item".to_string())),
                Some(ItemStatus::Inactive) => {
                    return Err(AppError::InvalidState(format!(
                        "Inventory item {} is inactive and cannot be used in a recipe",
                        row.inventory_item_id
                    )))
                }
                Some(ItemStatus::Active) => {}
            }
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let ingredient = sqlx::query_as::<_, RecipeIngredient>(
                r#"
                INSERT INTO recipe_ingredients (product_id, inventory_item_id, quantity_needed)
                VALUES ($1, $2, $3)
                RETURNING id, product_id, inventory_item_id, quantity_needed
                "#,
            )
            .bind(product_id)
            .bind(row.inventory_item_id)
            .bind(row.quantity_needed)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(ingredient);
        }

        tx.commit().await?;

        Ok(stored)
    }

    /// How many whole units of the product current raw-material stock can
    /// support. A product with no recipe rows yields 0.
    pub async fn calculate_max_producible(&self, product_id: Uuid) -> AppResult<i64> {
        let lines = self.ingredients_for(product_id).await?;
        let pairs: Vec<(Decimal, Decimal)> = lines
            .iter()
            .map(|line| (line.item.current_stock, line.quantity_needed))
            .collect();
        Ok(max_producible(&pairs))
    }

    async fn ensure_product_exists(&self, product_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }
}
