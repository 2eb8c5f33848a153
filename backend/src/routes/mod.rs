//! Route definitions for the Kitchen Back Office API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Categories and units of measure
        .nest("/categories", category_routes())
        .nest("/units", unit_routes())
        // Raw-material inventory
        .nest("/items", item_routes())
        // Products, recipes, production
        .nest("/products", product_routes())
        // Costing and profitability reports
        .nest("/reports", report_routes())
        // Stock alerts
        .nest("/notifications", notification_routes())
        // Stock movement ledger
        .route("/activity", get(handlers::list_activity))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_category))
        .route("/", get(handlers::list_categories))
        .route("/:id", get(handlers::get_category))
        .route("/:id", put(handlers::update_category))
        .route("/:id", delete(handlers::delete_category))
}

fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_unit))
        .route("/", get(handlers::list_units))
        .route("/:id", put(handlers::update_unit))
        .route("/:id", delete(handlers::delete_unit))
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_item))
        .route("/", get(handlers::list_items))
        .route("/low-stock", get(handlers::list_low_stock))
        .route("/critical-stock", get(handlers::list_critical_stock))
        .route("/out-of-stock", get(handlers::list_out_of_stock))
        .route("/expiring", get(handlers::list_expiring))
        .route("/expired", get(handlers::list_expired))
        .route("/:id", get(handlers::get_item))
        .route("/:id", put(handlers::update_item))
        .route("/:id", delete(handlers::delete_item))
        .route("/:id/adjust", post(handlers::adjust_stock))
        .route("/:id/deactivate", post(handlers::deactivate_item))
        .route("/:id/activate", post(handlers::activate_item))
        .route("/:id/movements", get(handlers::item_movements))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_product))
        .route("/", get(handlers::list_products))
        .route("/:id", get(handlers::get_product))
        .route("/:id", put(handlers::update_product))
        .route("/:id", delete(handlers::delete_product))
        .route("/:id/recipe", get(handlers::get_recipe))
        .route("/:id/recipe", put(handlers::set_recipe))
        .route("/:id/max-producible", get(handlers::max_producible))
        .route("/:id/produce", post(handlers::produce))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/:id/cogs", get(handlers::order_cogs))
        .route("/sales-summary", get(handlers::sales_summary))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/unread-count", get(handlers::unread_count))
        .route("/:id/read", put(handlers::mark_read))
        .route("/read-all", put(handlers::mark_all_read))
}
