//! HTTP handlers for costing and profitability reports

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::DateRange;
use crate::services::costing::{CostingService, OrderCogs, SalesSummary};
use crate::AppState;

/// COGS breakdown for one order
pub async fn order_cogs(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderCogs>> {
    let service = CostingService::new(state.db);
    let cogs = service.cogs_for_order(order_id).await?;
    Ok(Json(cogs))
}

/// Sales, COGS and gross profit over a date range
pub async fn sales_summary(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<SalesSummary>> {
    let service = CostingService::new(state.db);
    let summary = service.sales_summary(range).await?;
    Ok(Json(summary))
}
