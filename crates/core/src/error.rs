//! Domain error model.

use chrono::NaiveDate;
use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a recoverable value. Variants carry enough context
/// (product id, requested vs available quantity) for a caller to react without
/// re-querying the inventory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No product is stored under the requested id.
    #[error("product with id {0} not found")]
    NotFound(ProductId),

    /// A required field was missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A quantity that must be positive was zero or negative.
    #[error("invalid quantity {0}: quantity must be greater than zero")]
    InvalidQuantity(i64),

    /// The requested quantity exceeds the stock on hand.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    /// A stock reduction was attempted against an expired product.
    #[error("product {product_id} expired on {expiry_date}")]
    ExpiredProduct {
        product_id: ProductId,
        expiry_date: NaiveDate,
    },

    /// A stock count or a stock value would not fit its integer type.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// The backing store failed (lock poisoning, IO, ...).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(id: impl Into<ProductId>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Short machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::InvalidQuantity(_) => "invalid_quantity",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::ExpiredProduct { .. } => "expired_product",
            DomainError::Overflow(_) => "overflow",
            DomainError::Storage(_) => "storage_error",
        }
    }
}
