//! Costing service: cost-of-goods-sold reporting from recipe costs
//!
//! COGS for an order line is the product's recipe unit cost multiplied by
//! the quantity sold. Intermediate arithmetic stays exact; currency rounding
//! happens once, at the final aggregation.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{recipe_unit_cost, round_currency, DateRange};
use crate::services::recipe::RecipeService;

/// Costing service for COGS and profitability reports
#[derive(Clone)]
pub struct CostingService {
    db: PgPool,
    recipes: RecipeService,
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

/// COGS breakdown for one order line
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineCogs {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub line_cogs: Decimal,
}

/// COGS breakdown for a whole order
#[derive(Debug, Clone, Serialize)]
pub struct OrderCogs {
    pub order_id: Uuid,
    pub lines: Vec<OrderLineCogs>,
    pub total_cogs: Decimal,
}

/// Sales and profitability totals over a date range
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    pub order_count: i64,
    pub total_sales: Decimal,
    pub total_cogs: Decimal,
    pub gross_profit: Decimal,
}

impl CostingService {
    /// Create a new CostingService instance
    pub fn new(db: PgPool) -> Self {
        let recipes = RecipeService::new(db.clone());
        Self { db, recipes }
    }

    /// COGS for a single order, with a per-line breakdown
    pub async fn cogs_for_order(&self, order_id: Uuid) -> AppResult<OrderCogs> {
        self.ensure_order_exists(order_id).await?;

        let rows = self.order_lines(order_id).await?;

        let mut lines = Vec::with_capacity(rows.len());
        let mut total = Decimal::ZERO;
        for row in rows {
            let unit_cost = self.unit_cost_for(row.product_id).await?;
            let line_cogs = unit_cost * Decimal::from(row.quantity);
            total += line_cogs;
            lines.push(OrderLineCogs {
                product_id: row.product_id,
                product_name: row.product_name,
                quantity: row.quantity,
                unit_cost: round_currency(unit_cost),
                line_cogs: round_currency(line_cogs),
            });
        }

        Ok(OrderCogs {
            order_id,
            lines,
            total_cogs: round_currency(total),
        })
    }

    /// Sales, COGS and gross profit over completed orders in a date range
    pub async fn sales_summary(&self, range: DateRange) -> AppResult<SalesSummary> {
        if range.end < range.start {
            return Err(AppError::Validation {
                field: "end".to_string(),
                message: "End date must not be before start date".to_string(),
            });
        }

        let order_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM orders
            WHERE status = 'completed' AND order_date BETWEEN $1 AND $2
            ORDER BY order_date
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let mut total_sales = Decimal::ZERO;
        let mut total_cogs = Decimal::ZERO;
        for order_id in &order_ids {
            for row in self.order_lines(*order_id).await? {
                let quantity = Decimal::from(row.quantity);
                total_sales += row.unit_price * quantity;
                total_cogs += self.unit_cost_for(row.product_id).await? * quantity;
            }
        }

        let gross_profit = total_sales - total_cogs;

        Ok(SalesSummary {
            start: range.start,
            end: range.end,
            order_count: order_ids.len() as i64,
            total_sales: round_currency(total_sales),
            total_cogs: round_currency(total_cogs),
            gross_profit: round_currency(gross_profit),
        })
    }

    /// Exact (unrounded) recipe unit cost for one product
    async fn unit_cost_for(&self, product_id: Uuid) -> AppResult<Decimal> {
        let lines = self.recipes.ingredients_for(product_id).await?;
        let pairs: Vec<(Decimal, Decimal)> = lines
            .iter()
            .map(|line| (line.item.cost_per_unit, line.quantity_needed))
            .collect();
        Ok(recipe_unit_cost(&pairs))
    }

    async fn order_lines(&self, order_id: Uuid) -> AppResult<Vec<OrderLineRow>> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn ensure_order_exists(&self, order_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
                .bind(order_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(())
    }
}
