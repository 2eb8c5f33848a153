//! Inventory service: raw-material items and the stock adjustment engine
//!
//! Every mutation of `inventory_items.current_stock` goes through
//! `apply_adjustment`, which locks the item row for the duration of the
//! enclosing transaction. Nothing else in the codebase writes that column.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{expiration_date_after, stock_percent_of_low, StockStatus};
use crate::services::activity::ActivityLogService;
use crate::services::notification::NotificationService;
use shared::validation;

/// Inventory service for raw-material items and stock adjustments
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Lifecycle status of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ItemStatus::Active),
            "inactive" => Some(ItemStatus::Inactive),
            _ => None,
        }
    }
}

/// A raw-material inventory item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub current_stock: Decimal,
    pub low_stock_threshold: Decimal,
    pub critical_stock_threshold: Decimal,
    pub cost_per_unit: Decimal,
    pub status: ItemStatus,
    pub received_date: Option<NaiveDate>,
    pub expiration_days: Option<i32>,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Derived classification; never persisted
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(
            self.current_stock,
            self.low_stock_threshold,
            self.critical_stock_threshold,
        )
    }
}

/// Item plus its derived indicators, for API responses
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub stock_status: StockStatus,
    pub stock_percent_of_low: Option<Decimal>,
}

impl From<InventoryItem> for ItemView {
    fn from(item: InventoryItem) -> Self {
        let stock_status = item.stock_status();
        let percent = stock_percent_of_low(item.current_stock, item.low_stock_threshold);
        Self {
            item,
            stock_status,
            stock_percent_of_low: percent,
        }
    }
}

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub low_stock_threshold: Decimal,
    pub critical_stock_threshold: Decimal,
    pub cost_per_unit: Decimal,
    pub initial_stock: Option<Decimal>,
    pub received_date: Option<NaiveDate>,
    pub expiration_days: Option<i32>,
}

/// Input for non-quantity edits to an item
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub low_stock_threshold: Option<Decimal>,
    pub critical_stock_threshold: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
    pub status: Option<ItemStatus>,
}

/// Input for a stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub quantity_change: Decimal,
    pub reason: String,
    pub performed_by: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub expiration_days: Option<i32>,
}

/// List filter for items
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub status: Option<String>,
}

/// Outcome of one applied adjustment, used for side effects
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub item: InventoryItem,
    pub previous_stock: Decimal,
    pub previous_status: StockStatus,
    pub new_status: StockStatus,
}

impl StockAdjustment {
    pub fn quantity_change(&self) -> Decimal {
        self.item.current_stock - self.previous_stock
    }

    /// Whether the adjustment moved the item into an alarming class
    pub fn crossed_threshold(&self) -> bool {
        self.new_status != self.previous_status && self.new_status.is_alarming()
    }
}

const ITEM_COLUMNS: &str = "id, name, category_id, unit_id, current_stock, low_stock_threshold, \
     critical_stock_threshold, cost_per_unit, status, received_date, expiration_days, \
     expiration_date, created_at, last_updated";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Stock adjustment engine
    // ------------------------------------------------------------------

    /// Apply a stock adjustment inside the caller's transaction.
    ///
    /// Locks the item row with `FOR UPDATE` so concurrent adjustments on the
    /// same item serialize instead of racing the read-modify-write. Fails
    /// without modifying the row when the item is inactive or the change
    /// would drive stock negative; the caller's rollback then leaves
    /// everything untouched.
    pub(crate) async fn apply_adjustment(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        quantity_change: Decimal,
        received_date: Option<NaiveDate>,
        expiration_days: Option<i32>,
    ) -> AppResult<StockAdjustment> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        if item.status != ItemStatus::Active {
            return Err(AppError::InvalidState(format!(
                "Inventory item '{}' is inactive",
                item.name
            )));
        }

        let new_stock = item.current_stock + quantity_change;
        if new_stock < Decimal::ZERO {
            return Err(AppError::InsufficientStock(format!(
                "{}: change of {} exceeds available stock {}",
                item.name, quantity_change, item.current_stock
            )));
        }

        let mut new_received_date = item.received_date;
        let mut new_expiration_days = item.expiration_days;
        let mut new_expiration_date = item.expiration_date;

        if quantity_change > Decimal::ZERO {
            // Restock: overwrite the received date only when supplied
            if received_date.is_some() {
                new_received_date = received_date;
            }
            // Recompute expiration only when the shelf-life setting changed,
            // anchored to today to reflect freshly arrived stock
            if let Some(days) = expiration_days {
                if Some(days) != item.expiration_days {
                    new_expiration_days = Some(days);
                    new_expiration_date =
                        expiration_date_after(Utc::now().date_naive(), Some(days));
                }
            }
        }

        let updated = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET current_stock = $1, received_date = $2, expiration_days = $3,
                expiration_date = $4, last_updated = NOW()
            WHERE id = $5
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(new_stock)
        .bind(new_received_date)
        .bind(new_expiration_days)
        .bind(new_expiration_date)
        .bind(item_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(StockAdjustment {
            previous_stock: item.current_stock,
            previous_status: item.stock_status(),
            new_status: updated.stock_status(),
            item: updated,
        })
    }

    /// Adjust an item's stock by a signed quantity.
    ///
    /// The adjustment commits in its own transaction; the audit entry and
    /// any low-stock notification are emitted afterwards, best-effort.
    pub async fn adjust_stock(
        &self,
        item_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<InventoryItem> {
        if input.quantity_change == Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity_change".to_string(),
                message: "Quantity change cannot be zero".to_string(),
            });
        }
        if input.reason.trim().is_empty() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "A reason is required for stock adjustments".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let adjustment = Self::apply_adjustment(
            &mut tx,
            item_id,
            input.quantity_change,
            input.received_date,
            input.expiration_days,
        )
        .await?;
        tx.commit().await?;

        spawn_adjustment_effects(
            self.db.clone(),
            adjustment.clone(),
            input.reason,
            input.performed_by,
        );

        Ok(adjustment.item)
    }

    // ------------------------------------------------------------------
    // Item CRUD
    // ------------------------------------------------------------------

    /// Create an inventory item
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<InventoryItem> {
        validate_name_field(&input.name)?;

        let (low, critical) = self.normalized_thresholds(
            &input.name,
            input.low_stock_threshold,
            input.critical_stock_threshold,
        )?;

        if input.cost_per_unit < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "cost_per_unit".to_string(),
                message: "Cost per unit cannot be negative".to_string(),
            });
        }

        let initial_stock = input.initial_stock.unwrap_or(Decimal::ZERO);
        if initial_stock < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "initial_stock".to_string(),
                message: "Initial stock cannot be negative".to_string(),
            });
        }

        self.ensure_category_exists(input.category_id).await?;
        self.ensure_unit_exists(input.unit_id).await?;
        self.ensure_name_available(&input.name, None).await?;

        // Only stock actually on hand gets a received date
        let received_date = if initial_stock > Decimal::ZERO {
            input.received_date.or_else(|| Some(Utc::now().date_naive()))
        } else {
            input.received_date
        };
        let expiration_date =
            expiration_date_after(Utc::now().date_naive(), input.expiration_days);

        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items (
                name, category_id, unit_id, current_stock, low_stock_threshold,
                critical_stock_threshold, cost_per_unit, status, received_date,
                expiration_days, expiration_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.category_id)
        .bind(input.unit_id)
        .bind(initial_stock)
        .bind(low)
        .bind(critical)
        .bind(input.cost_per_unit)
        .bind(ItemStatus::Active)
        .bind(received_date)
        .bind(input.expiration_days)
        .bind(expiration_date)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Apply non-quantity edits to an item (name, category, unit, thresholds,
    /// cost, status). Idempotent: identical edits change only `last_updated`.
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItem> {
        let mut tx = self.db.begin().await?;

        // Lock the row so edits serialize with concurrent stock adjustments
        let existing = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let name = input.name.unwrap_or_else(|| existing.name.clone());
        validate_name_field(&name)?;

        let category_id = input.category_id.unwrap_or(existing.category_id);
        let unit_id = input.unit_id.unwrap_or(existing.unit_id);
        let low_input = input
            .low_stock_threshold
            .unwrap_or(existing.low_stock_threshold);
        let critical_input = input
            .critical_stock_threshold
            .unwrap_or(existing.critical_stock_threshold);
        let cost_per_unit = input.cost_per_unit.unwrap_or(existing.cost_per_unit);
        let status = input.status.unwrap_or(existing.status);

        let (low, critical) = self.normalized_thresholds(&name, low_input, critical_input)?;

        if cost_per_unit < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "cost_per_unit".to_string(),
                message: "Cost per unit cannot be negative".to_string(),
            });
        }

        if category_id != existing.category_id {
            self.ensure_category_exists(category_id).await?;
        }
        if unit_id != existing.unit_id {
            self.ensure_unit_exists(unit_id).await?;
        }
        self.ensure_name_available(&name, Some(item_id)).await?;

        // Deactivation is only allowed for empty, recipe-free items;
        // reactivation is unrestricted
        if status == ItemStatus::Inactive && existing.status == ItemStatus::Active {
            Self::ensure_retirable(&mut tx, &existing).await?;
        }

        let updated = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET name = $1, category_id = $2, unit_id = $3, low_stock_threshold = $4,
                critical_stock_threshold = $5, cost_per_unit = $6, status = $7,
                last_updated = NOW()
            WHERE id = $8
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(name.trim())
        .bind(category_id)
        .bind(unit_id)
        .bind(low)
        .bind(critical)
        .bind(cost_per_unit)
        .bind(status)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Deactivate an item. Blocked while it holds stock or is referenced by
    /// any product recipe.
    pub async fn deactivate_item(&self, item_id: Uuid) -> AppResult<InventoryItem> {
        self.update_item(
            item_id,
            UpdateItemInput {
                status: Some(ItemStatus::Inactive),
                ..UpdateItemInput::default()
            },
        )
        .await
    }

    /// Reactivate an item. Always allowed.
    pub async fn activate_item(&self, item_id: Uuid) -> AppResult<InventoryItem> {
        self.update_item(
            item_id,
            UpdateItemInput {
                status: Some(ItemStatus::Active),
                ..UpdateItemInput::default()
            },
        )
        .await
    }

    /// Permanently delete an item, under the same conditions as deactivation
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Self::ensure_retirable(&mut tx, &existing).await?;

        sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get an item by ID
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))
    }

    /// List items, optionally filtered by status
    pub async fn list_items(&self, query: ListItemsQuery) -> AppResult<Vec<InventoryItem>> {
        let status = match query.status.as_deref() {
            Some(raw) => Some(ItemStatus::from_str(raw).ok_or_else(|| AppError::Validation {
                field: "status".to_string(),
                message: format!("Unknown item status '{}'", raw),
            })?),
            None => None,
        };

        let items = match status {
            Some(status) => {
                sqlx::query_as::<_, InventoryItem>(&format!(
                    "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE status = $1 ORDER BY name"
                ))
                .bind(status)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, InventoryItem>(&format!(
                    "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY name"
                ))
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(items)
    }

    // ------------------------------------------------------------------
    // Query surface (lock-free)
    // ------------------------------------------------------------------

    /// Active items currently classified as low (but not critical or empty)
    pub async fn find_low_stock_items(&self) -> AppResult<Vec<InventoryItem>> {
        self.find_by_stock_status(StockStatus::Low).await
    }

    /// Active items at or below their critical threshold
    pub async fn find_critical_stock_items(&self) -> AppResult<Vec<InventoryItem>> {
        self.find_by_stock_status(StockStatus::Critical).await
    }

    /// Active items with no stock at all
    pub async fn find_out_of_stock_items(&self) -> AppResult<Vec<InventoryItem>> {
        self.find_by_stock_status(StockStatus::NoStock).await
    }

    async fn find_by_stock_status(&self, wanted: StockStatus) -> AppResult<Vec<InventoryItem>> {
        // Classification happens in one place (the pure classifier), so the
        // lists can never disagree with the per-item derived status
        let items = self.active_items().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.stock_status() == wanted)
            .collect())
    }

    /// Active items expiring within the next `within_days` days
    pub async fn find_expiring_items(&self, within_days: u64) -> AppResult<Vec<InventoryItem>> {
        let today = Utc::now().date_naive();
        let cutoff = today
            .checked_add_days(Days::new(within_days))
            .unwrap_or(today);

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM inventory_items
            WHERE status = 'active' AND expiration_date IS NOT NULL
              AND expiration_date BETWEEN $1 AND $2
            ORDER BY expiration_date
            "#
        ))
        .bind(today)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Active items whose expiration date has passed
    pub async fn find_expired_items(&self) -> AppResult<Vec<InventoryItem>> {
        let today = Utc::now().date_naive();

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM inventory_items
            WHERE status = 'active' AND expiration_date IS NOT NULL
              AND expiration_date < $1
            ORDER BY expiration_date
            "#
        ))
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn active_items(&self) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE status = 'active' ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn normalized_thresholds(
        &self,
        item_name: &str,
        low: Decimal,
        critical: Decimal,
    ) -> AppResult<(Decimal, Decimal)> {
        let (low, critical, clamped) = validation::normalize_thresholds(low, critical)
            .map_err(|msg| AppError::Validation {
                field: "thresholds".to_string(),
                message: msg.to_string(),
            })?;
        if clamped {
            tracing::warn!(
                "Critical threshold above low threshold for '{}'; clamped down to {}",
                item_name,
                low
            );
        }
        Ok((low, critical))
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

    async fn ensure_unit_exists(&self, unit_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM units_of_measure WHERE id = $1)",
        )
        .bind(unit_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Unit of measure".to_string()));
        }
        Ok(())
    }

    async fn ensure_name_available(&self, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inventory_items
                WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name.trim())
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("item name".to_string()));
        }
        Ok(())
    }

    /// An item may be deactivated or deleted only when it holds no stock
    /// and no product recipe references it
    async fn ensure_retirable(
        tx: &mut Transaction<'_, Postgres>,
        item: &InventoryItem,
    ) -> AppResult<()> {
        if item.current_stock > Decimal::ZERO {
            return Err(AppError::Conflict {
                resource: "inventory_item".to_string(),
                message: format!(
                    "'{}' still has {} in stock; adjust it to zero first",
                    item.name, item.current_stock
                ),
            });
        }

        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recipe_ingredients WHERE inventory_item_id = $1)",
        )
        .bind(item.id)
        .fetch_one(&mut **tx)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: "inventory_item".to_string(),
                message: format!("'{}' is used by one or more product recipes", item.name),
            });
        }

        Ok(())
    }
}

fn validate_name_field(name: &str) -> AppResult<()> {
    validation::validate_name(name).map_err(|msg| AppError::Validation {
        field: "name".to_string(),
        message: msg.to_string(),
    })
}

/// Emit the audit entry and any threshold notification for a committed
/// adjustment. Fire-and-forget: failures are logged and never affect the
/// adjustment itself.
pub(crate) fn spawn_adjustment_effects(
    db: PgPool,
    adjustment: StockAdjustment,
    reason: String,
    performed_by: Option<String>,
) {
    tokio::spawn(async move {
        let item = &adjustment.item;

        let activity = ActivityLogService::new(db.clone());
        if let Err(e) = activity
            .log_stock_change(
                item.id,
                adjustment.quantity_change(),
                item.current_stock,
                &reason,
                performed_by.as_deref(),
            )
            .await
        {
            tracing::warn!("Failed to record stock movement for {}: {}", item.id, e);
        }

        if adjustment.crossed_threshold() {
            let notifications = NotificationService::new(db);
            if let Err(e) = notifications
                .notify_low_stock(item, adjustment.new_status)
                .await
            {
                tracing::warn!("Failed to send stock notification for {}: {}", item.id, e);
            }
        }
    });
}
