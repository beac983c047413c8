//! Inventory domain module.
//!
//! Business rules for perishable stock, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage). Time enters only as an explicit
//! `now` argument.

pub mod product;
pub mod restock;

pub use product::{DEFAULT_MIN_STOCK, NewProduct, Product, ProductUpdate};
pub use restock::RestockRecord;
