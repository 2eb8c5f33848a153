//! Domain models for the Kitchen Back Office backend
//!
//! Re-exports the pure domain computations from the shared crate

pub use shared::models::*;
pub use shared::types::*;
