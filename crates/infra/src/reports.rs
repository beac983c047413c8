//! Result types returned by `InventoryService`.
//!
//! These are plain serializable values assembled from one read of the
//! repository; they hold no references back into the store.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use shelflife_core::{DomainError, DomainResult, ProductId};
use shelflife_inventory::Product;

/// Outcome of a single stock increase or decrease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockChange {
    pub product: Product,
    pub message: String,
}

/// Read-only answer to "can this quantity be taken right now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub product_id: ProductId,
    pub product_name: String,
    pub available: bool,
    pub current_stock: u64,
    pub requested_quantity: u64,
    pub is_expired: bool,
}

/// One line of a batch availability check.
///
/// A failed line is still a result: the batch never aborts because one
/// product is unknown or the quantity is bad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemAvailability {
    Checked(Availability),
    Failed {
        product_id: ProductId,
        available: bool,
        error: String,
    },
}

impl ItemAvailability {
    pub fn failed(product_id: ProductId, error: &DomainError) -> Self {
        Self::Failed {
            product_id,
            available: false,
            error: error.to_string(),
        }
    }

    pub fn available(&self) -> bool {
        match self {
            ItemAvailability::Checked(a) => a.available,
            ItemAvailability::Failed { available, .. } => *available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchAvailability {
    pub all_available: bool,
    pub results: Vec<ItemAvailability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReduction {
    pub message: String,
    pub results: Vec<StockChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockEntry {
    pub id: ProductId,
    pub name: String,
    pub current_stock: u64,
    pub min_stock: u64,
    /// `min_stock - current_stock`, exact over the whole `u64` range.
    pub needs_restock: i128,
}

impl From<&Product> for LowStockEntry {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id_typed().clone(),
            name: p.name().to_string(),
            current_stock: p.stock(),
            min_stock: p.min_stock(),
            needs_restock: p.restock_deficit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockAlert {
    pub alert_count: usize,
    pub products: Vec<LowStockEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringEntry {
    pub id: ProductId,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredEntry {
    pub id: ProductId,
    pub name: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryAlert {
    pub window_days: i64,
    pub expiring_soon: Vec<ExpiringEntry>,
    pub expired: Vec<ExpiredEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub count: usize,
    pub total_stock: u128,
    pub total_value: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_stock_value: u128,
    pub low_stock_count: usize,
    /// Categories in order of first appearance in the catalog.
    pub categories: IndexMap<String, CategorySummary>,
}

impl InventorySummary {
    /// Aggregate one snapshot of the catalog.
    ///
    /// Totals are exact; a catalog whose value does not fit a `u128` is
    /// reported as `Overflow` rather than clamped.
    pub fn from_snapshot(products: &[Product]) -> DomainResult<Self> {
        let mut categories: IndexMap<String, CategorySummary> = IndexMap::new();
        let mut total_stock_value: u128 = 0;
        let mut low_stock_count = 0;

        for p in products {
            let value = p.stock_value();
            total_stock_value = checked_total(total_stock_value, value, "total stock value")?;
            if p.is_low_stock() {
                low_stock_count += 1;
            }

            let entry = categories.entry(p.category().to_string()).or_default();
            entry.count += 1;
            entry.total_stock =
                checked_total(entry.total_stock, u128::from(p.stock()), p.category())?;
            entry.total_value = checked_total(entry.total_value, value, p.category())?;
        }

        Ok(Self {
            total_products: products.len(),
            total_stock_value,
            low_stock_count,
            categories,
        })
    }
}

fn checked_total(total: u128, add: u128, what: &str) -> DomainResult<u128> {
    total
        .checked_add(add)
        .ok_or_else(|| DomainError::overflow(format!("{what} exceeds {}", u128::MAX)))
}
