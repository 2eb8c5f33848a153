//! Shared domain logic for the Kitchen Back Office
//!
//! This crate contains the pure parts of the inventory and costing engine:
//! stock classification, recipe arithmetic, and validation helpers. Nothing
//! in here touches the database or performs I/O, so every derived value can
//! be recomputed from persisted fields at any time.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
