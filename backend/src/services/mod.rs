pub mod activity;
pub mod catalog;
pub mod costing;
pub mod inventory;
pub mod notification;
pub mod product;
pub mod production;
pub mod recipe;

pub use activity::ActivityLogService;
pub use catalog::CatalogService;
pub use costing::CostingService;
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use product::ProductService;
pub use production::ProductionService;
pub use recipe::RecipeService;
