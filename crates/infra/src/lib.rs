//! Infrastructure layer: storage, inventory orchestration, reports.

pub mod inventory_service;
pub mod reports;
pub mod repository;
pub mod seed;


pub use inventory_service::{
    DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_HISTORY_LIMIT, DEFAULT_PERFORMED_BY,
    DEFAULT_REDUCE_REASON, DEFAULT_RESTOCK_REASON, InventoryService, StockRequest,
};
pub use repository::{InMemoryProductRepository, ProductRepository, WriteBatch};
