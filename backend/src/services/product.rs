//! Product service: finished goods offered for sale
//!
//! Finished-good stock is a separate counter from raw-material stock. It is
//! only incremented by successful production runs; sales and waste belong to
//! the order fulfillment flow outside this subsystem.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::StockStatus;
use shared::validation;

/// Product service for managing finished goods
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Lifecycle status of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

/// A finished good
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub current_stock: Decimal,
    pub low_stock_threshold: Decimal,
    pub critical_stock_threshold: Decimal,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Derived classification of finished-good stock; never persisted.
    /// Uses the same classifier as raw-material items.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(
            self.current_stock,
            self.low_stock_threshold,
            self.critical_stock_threshold,
        )
    }
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub low_stock_threshold: Option<Decimal>,
    pub critical_stock_threshold: Option<Decimal>,
}

/// Input for editing a product
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub low_stock_threshold: Option<Decimal>,
    pub critical_stock_threshold: Option<Decimal>,
    pub status: Option<ProductStatus>,
}

const PRODUCT_COLUMNS: &str = "id, name, category_id, price, current_stock, low_stock_threshold, \
     critical_stock_threshold, status, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        validation::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if input.price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }

        self.ensure_category_exists(input.category_id).await?;
        self.ensure_name_available(&input.name, None).await?;

        let low = input.low_stock_threshold.unwrap_or(Decimal::ZERO);
        let critical = input.critical_stock_threshold.unwrap_or(Decimal::ZERO);
        let (low, critical, clamped) =
            validation::normalize_thresholds(low, critical).map_err(|msg| AppError::Validation {
                field: "thresholds".to_string(),
                message: msg.to_string(),
            })?;
        if clamped {
            tracing::warn!(
                "Critical threshold above low threshold for product '{}'; clamped down to {}",
                input.name,
                low
            );
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, category_id, price, current_stock,
                                  low_stock_threshold, critical_stock_threshold, status)
            VALUES ($1, $2, $3, 0, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.category_id)
        .bind(input.price)
        .bind(low)
        .bind(critical)
        .bind(ProductStatus::Active)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Edit a product
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;

        let name = input.name.unwrap_or_else(|| existing.name.clone());
        validation::validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let category_id = input.category_id.unwrap_or(existing.category_id);
        let price = input.price.unwrap_or(existing.price);
        let low = input
            .low_stock_threshold
            .unwrap_or(existing.low_stock_threshold);
        let critical = input
            .critical_stock_threshold
            .unwrap_or(existing.critical_stock_threshold);
        let status = input.status.unwrap_or(existing.status);

        if price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }

        let (low, critical, clamped) =
            validation::normalize_thresholds(low, critical).map_err(|msg| AppError::Validation {
                field: "thresholds".to_string(),
                message: msg.to_string(),
            })?;
        if clamped {
            tracing::warn!(
                "Critical threshold above low threshold for product '{}'; clamped down to {}",
                name,
                low
            );
        }

        if category_id != existing.category_id {
            self.ensure_category_exists(category_id).await?;
        }
        self.ensure_name_available(&name, Some(product_id)).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $1, category_id = $2, price = $3, low_stock_threshold = $4,
                critical_stock_threshold = $5, status = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name.trim())
        .bind(category_id)
        .bind(price)
        .bind(low)
        .bind(critical)
        .bind(status)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Delete a product. Its recipe rows cascade; past order lines keep the
    /// product alive.
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM order_items WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "Product appears on existing orders and cannot be deleted".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List all products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Category".to_string()));
        }
        Ok(())
    }

    async fn ensure_name_available(&self, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM products
                WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name.trim())
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("product name".to_string()));
        }
        Ok(())
    }
}
