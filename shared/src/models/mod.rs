//! Pure domain computations for the Kitchen Back Office

mod inventory;
mod product;

pub use inventory::*;
pub use product::*;
