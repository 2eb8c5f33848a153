//! Activity log service: the append-only stock movement ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Activity log service for recording stock movements
#[derive(Clone)]
pub struct ActivityLogService {
    db: PgPool,
}

/// One recorded stock movement
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub item_id: Uuid,
    pub quantity_change: Decimal,
    pub stock_after: Decimal,
    pub reason: String,
    pub performed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLogService {
    /// Create a new ActivityLogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append one movement to the ledger
    pub async fn log_stock_change(
        &self,
        item_id: Uuid,
        quantity_change: Decimal,
        stock_after: Decimal,
        reason: &str,
        performed_by: Option<&str>,
    ) -> AppResult<StockMovement> {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (item_id, quantity_change, stock_after, reason, performed_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, item_id, quantity_change, stock_after, reason, performed_by, created_at
            "#,
        )
        .bind(item_id)
        .bind(quantity_change)
        .bind(stock_after)
        .bind(reason)
        .bind(performed_by)
        .fetch_one(&self.db)
        .await?;

        Ok(movement)
    }

    /// Recent movements for one item, newest first
    pub async fn recent_for_item(&self, item_id: Uuid, limit: i64) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, item_id, quantity_change, stock_after, reason, performed_by, created_at
            FROM stock_movements
            WHERE item_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(item_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Recent movements across all items, newest first
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, item_id, quantity_change, stock_after, reason, performed_by, created_at
            FROM stock_movements
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
