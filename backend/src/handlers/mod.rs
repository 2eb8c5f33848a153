pub mod activity;
pub mod catalog;
pub mod inventory;
pub mod notifications;
pub mod products;
pub mod reports;

pub use activity::*;
pub use catalog::*;
pub use inventory::*;
pub use notifications::*;
pub use products::*;
pub use reports::*;
