//! Notification service: persisted alerts for threshold crossings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::StockStatus;
use crate::services::inventory::InventoryItem;

/// Notification service for managing stock alerts
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LowStock,
    CriticalStock,
    OutOfStock,
    System,
}

impl NotificationType {
    /// Notification kind for an alarming stock status; None for Normal
    pub fn for_stock_status(status: StockStatus) -> Option<Self> {
        match status {
            StockStatus::Normal => None,
            StockStatus::Low => Some(NotificationType::LowStock),
            StockStatus::Critical => Some(NotificationType::CriticalStock),
            StockStatus::NoStock => Some(NotificationType::OutOfStock),
        }
    }
}

/// A persisted notification
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an alert for an item that has entered an alarming status.
    /// Returns None when the status does not warrant one.
    pub async fn notify_low_stock(
        &self,
        item: &InventoryItem,
        status: StockStatus,
    ) -> AppResult<Option<Notification>> {
        let Some(notification_type) = NotificationType::for_stock_status(status) else {
            return Ok(None);
        };

        let title = format!("{} is {}", item.name, status.label());
        let message = format!(
            "{} has {} left (low threshold {}, critical threshold {})",
            item.name, item.current_stock, item.low_stock_threshold, item.critical_stock_threshold
        );

        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (notification_type, title, message, entity_type, entity_id)
            VALUES ($1, $2, $3, 'inventory_item', $4)
            RETURNING id, notification_type, title, message, entity_type, entity_id, is_read, created_at
            "#,
        )
        .bind(notification_type)
        .bind(&title)
        .bind(&message)
        .bind(item.id)
        .fetch_one(&self.db)
        .await?;

        Ok(Some(notification))
    }

    /// List notifications, newest first
    pub async fn list_notifications(&self, limit: i64) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, notification_type, title, message, entity_type, entity_id, is_read, created_at
            FROM notifications
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Count unread notifications
    pub async fn unread_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE is_read = FALSE",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(notification_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }

        Ok(())
    }

    /// Mark every notification as read, returning how many changed
    pub async fn mark_all_read(&self) -> AppResult<u64> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE is_read = FALSE")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
