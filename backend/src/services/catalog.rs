//! Catalog service: inventory categories and units of measure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation;

/// Catalog service for managing categories and units
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// A grouping of inventory items for browsing and reporting
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a category
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

/// A unit of measure (e.g. "Kilogram" / "kg")
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UnitOfMeasure {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or editing a unit of measure
#[derive(Debug, Deserialize)]
pub struct UnitInput {
    pub name: String,
    pub abbreviation: String,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Create a category
    pub async fn create_category(&self, input: CategoryInput) -> AppResult<InventoryCategory> {
        validate_name(&input.name)?;
        self.ensure_category_name_available(&input.name, None).await?;

        let category = sqlx::query_as::<_, InventoryCategory>(
            "INSERT INTO inventory_categories (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }

    /// Rename a category
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: CategoryInput,
    ) -> AppResult<InventoryCategory> {
        validate_name(&input.name)?;
        self.ensure_category_name_available(&input.name, Some(category_id))
            .await?;

        sqlx::query_as::<_, InventoryCategory>(
            "UPDATE inventory_categories SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(input.name.trim())
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    /// Delete a category. Blocked while any item references it.
    pub async fn delete_category(&self, category_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: "category".to_string(),
                message: "Category is still referenced by inventory items".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM inventory_categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    /// Get a category by ID
    pub async fn get_category(&self, category_id: Uuid) -> AppResult<InventoryCategory> {
        sqlx::query_as::<_, InventoryCategory>(
            "SELECT id, name, created_at FROM inventory_categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<InventoryCategory>> {
        let categories = sqlx::query_as::<_, InventoryCategory>(
            "SELECT id, name, created_at FROM inventory_categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    // ------------------------------------------------------------------
    // Units of measure
    // ------------------------------------------------------------------

    /// Create a unit of measure
    pub async fn create_unit(&self, input: UnitInput) -> AppResult<UnitOfMeasure> {
        validate_name(&input.name)?;
        validate_abbreviation(&input.abbreviation)?;
        self.ensure_unit_available(&input.name, &input.abbreviation, None)
            .await?;

        let unit = sqlx::query_as::<_, UnitOfMeasure>(
            r#"
            INSERT INTO units_of_measure (name, abbreviation)
            VALUES ($1, $2)
            RETURNING id, name, abbreviation, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.abbreviation.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(unit)
    }

    /// Edit a unit of measure
    pub async fn update_unit(&self, unit_id: Uuid, input: UnitInput) -> AppResult<UnitOfMeasure> {
        validate_name(&input.name)?;
        validate_abbreviation(&input.abbreviation)?;
        self.ensure_unit_available(&input.name, &input.abbreviation, Some(unit_id))
            .await?;

        sqlx::query_as::<_, UnitOfMeasure>(
            r#"
            UPDATE units_of_measure SET name = $1, abbreviation = $2
            WHERE id = $3
            RETURNING id, name, abbreviation, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.abbreviation.trim())
        .bind(unit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit of measure".to_string()))
    }

    /// Delete a unit of measure. Blocked while any item references it.
    pub async fn delete_unit(&self, unit_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE unit_id = $1)",
        )
        .bind(unit_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: "unit".to_string(),
                message: "Unit is still referenced by inventory items".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM units_of_measure WHERE id = $1")
            .bind(unit_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Unit of measure".to_string()));
        }

        Ok(())
    }

    /// List all units of measure
    pub async fn list_units(&self) -> AppResult<Vec<UnitOfMeasure>> {
        let units = sqlx::query_as::<_, UnitOfMeasure>(
            "SELECT id, name, abbreviation, created_at FROM units_of_measure ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(units)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn ensure_category_name_available(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inventory_categories
                WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name.trim())
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }
        Ok(())
    }

    async fn ensure_unit_available(
        &self,
        name: &str,
        abbreviation: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM units_of_measure
                WHERE (LOWER(name) = LOWER($1) OR LOWER(abbreviation) = LOWER($2))
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(name.trim())
        .bind(abbreviation.trim())
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("unit name or abbreviation".to_string()));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    validation::validate_name(name).map_err(|msg| AppError::Validation {
        field: "name".to_string(),
        message: msg.to_string(),
    })
}

fn validate_abbreviation(abbreviation: &str) -> AppResult<()> {
    let trimmed = abbreviation.trim();
    if trimmed.is_empty() || trimmed.len() > 16 {
        return Err(AppError::Validation {
            field: "abbreviation".to_string(),
            message: "Abbreviation must be between 1 and 16 characters".to_string(),
        });
    }
    Ok(())
}
