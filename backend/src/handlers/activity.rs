//! HTTP handlers for the stock movement ledger

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::activity::{ActivityLogService, StockMovement};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// Recent stock movements across all items
pub async fn list_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = ActivityLogService::new(state.db);
    let movements = service.list_recent(query.limit.unwrap_or(50)).await?;
    Ok(Json(movements))
}
