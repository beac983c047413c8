//! Inventory orchestration (application-level service).
//!
//! Every id-taking operation follows the same pipeline:
//!
//! ```text
//! lookup (NotFound if absent)
//!   ↓
//! validate input (InvalidQuantity, InvalidInput)
//!   ↓
//! mutate a copy of the entity (entity rules: InsufficientStock, ExpiredProduct)
//!   ↓
//! write back through the repository (one atomic commit per operation)
//! ```
//!
//! ## Concurrency
//!
//! Read-validate-write sequences are serialized by `gate`, so two concurrent
//! reductions of the same product can never both read the old stock. Writes
//! that touch more than one record (restock + audit entry, batch reductions)
//! go through `ProductRepository::commit` and land atomically. Reports that
//! need two scans (expiry alert) also hold the gate so both scans see the
//! same state.
//!
//! ## Batch reduce
//!
//! `batch_reduce_stock` is all-or-nothing: every line is applied to a staged
//! copy first, and only when all lines succeed is the staged state committed.
//! A failing line leaves every product untouched.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use indexmap::map::Entry;

use shelflife_core::{Clock, DomainError, DomainResult, ProductId, SystemClock};
use shelflife_inventory::{NewProduct, Product, ProductUpdate, RestockRecord};

use crate::reports::{
    Availability, BatchAvailability, BatchReduction, ExpiredEntry, ExpiringEntry, ExpiryAlert,
    InventorySummary, ItemAvailability, LowStockAlert, LowStockEntry, StockChange,
};
use crate::repository::{ProductRepository, WriteBatch};

pub const DEFAULT_RESTOCK_REASON: &str = "Manual restock";
pub const DEFAULT_PERFORMED_BY: &str = "Admin";
pub const DEFAULT_REDUCE_REASON: &str = "Order fulfillment";
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One line of a batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl StockRequest {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

fn positive_quantity(quantity: i64) -> DomainResult<u64> {
    if quantity <= 0 {
        return Err(DomainError::InvalidQuantity(quantity));
    }
    Ok(quantity as u64)
}

pub struct InventoryService<R> {
    repository: R,
    clock: Arc<dyn Clock>,
    gate: Mutex<()>,
}

impl<R> InventoryService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            gate: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Current time as seen by this service's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, ()>> {
        self.gate
            .lock()
            .map_err(|_| DomainError::storage("inventory write gate poisoned"))
    }
}

impl<R> InventoryService<R>
where
    R: ProductRepository,
{
    // -------------------------
    // Catalog
    // -------------------------

    pub fn all_products(&self) -> DomainResult<Vec<Product>> {
        self.repository.find_all()
    }

    pub fn product(&self, id: &ProductId) -> DomainResult<Product> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(id.clone()))
    }

    pub fn products_by_category(&self, category: &str) -> DomainResult<Vec<Product>> {
        self.repository.find_by_category(category)
    }

    pub fn create_product(&self, data: NewProduct) -> DomainResult<Product> {
        let _guard = self.lock()?;

        let mut id = ProductId::generate();
        while self.repository.find_by_id(&id)?.is_some() {
            id = ProductId::generate();
        }

        let product = Product::new(id, data, self.now())?;
        let product = self.repository.save(product)?;
        tracing::info!(product_id = %product.id_typed(), name = product.name(), "product created");
        Ok(product)
    }

    pub fn update_product(&self, id: &ProductId, update: ProductUpdate) -> DomainResult<Product> {
        let _guard = self.lock()?;
        let mut product = self.product(id)?;
        let touches_nothing = update.is_empty();

        product
            .apply_update(update, self.now())
            .inspect_err(|e| tracing::warn!(product_id = %id, "update rejected: {e}"))?;

        let product = self.repository.save(product)?;
        tracing::info!(product_id = %id, touches_nothing, "product updated");
        Ok(product)
    }

    /// Remove a product. Its restock history is kept.
    pub fn delete_product(&self, id: &ProductId) -> DomainResult<String> {
        let _guard = self.lock()?;
        let product = self.product(id)?;

        if !self.repository.delete(id)? {
            return Err(DomainError::NotFound(id.clone()));
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(format!("Product {} successfully deleted", product.name()))
    }

    // -------------------------
    // Stock mutations
    // -------------------------

    /// Increase stock and record the restock as one atomic write.
    pub fn add_stock(
        &self,
        id: &ProductId,
        quantity: i64,
        reason: Option<String>,
        performed_by: Option<String>,
    ) -> DomainResult<StockChange> {
        let _guard = self.lock()?;
        let mut product = self.product(id)?;
        let quantity = positive_quantity(quantity)
            .inspect_err(|e| tracing::warn!(product_id = %id, "restock rejected: {e}"))?;

        let now = self.now();
        product
            .add_stock(quantity, now)
            .inspect_err(|e| tracing::warn!(product_id = %id, "restock rejected: {e}"))?;
        let record = RestockRecord::new(
            id.clone(),
            quantity,
            reason.unwrap_or_else(|| DEFAULT_RESTOCK_REASON.to_string()),
            performed_by.unwrap_or_else(|| DEFAULT_PERFORMED_BY.to_string()),
            now,
        )?;

        self.repository
            .commit(WriteBatch::new().save(product.clone()).append_restock(record))
            .inspect_err(|e| tracing::error!(product_id = %id, "restock commit failed: {e}"))?;

        tracing::info!(product_id = %id, quantity, stock = product.stock(), "stock added");
        Ok(StockChange {
            message: format!(
                "Added {quantity} units to {}. New stock: {}",
                product.name(),
                product.stock()
            ),
            product,
        })
    }

    /// Decrease stock. No audit record is written for reductions.
    pub fn reduce_stock(
        &self,
        id: &ProductId,
        quantity: i64,
        reason: Option<String>,
    ) -> DomainResult<StockChange> {
        let _guard = self.lock()?;
        let mut product = self.product(id)?;
        let change = self
            .reduce_staged(&mut product, quantity, self.now())
            .inspect_err(|e| tracing::warn!(product_id = %id, "reduction rejected: {e}"))?;

        self.repository.save(product)?;
        tracing::info!(
            product_id = %id,
            quantity,
            stock = change.product.stock(),
            reason = reason.as_deref().unwrap_or(DEFAULT_REDUCE_REASON),
            "stock reduced"
        );
        Ok(change)
    }

    fn reduce_staged(
        &self,
        product: &mut Product,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<StockChange> {
        let quantity = positive_quantity(quantity)?;
        product.reduce_stock(quantity, now)?;
        Ok(StockChange {
            message: format!(
                "Reduced {quantity} units from {}. Remaining stock: {}",
                product.name(),
                product.stock()
            ),
            product: product.clone(),
        })
    }

    pub fn check_stock_availability(&self, id: &ProductId, quantity: i64) -> DomainResult<Availability> {
        let product = self.product(id)?;
        let requested = positive_quantity(quantity)?;
        let now = self.now();

        Ok(Availability {
            product_id: id.clone(),
            product_name: product.name().to_string(),
            available: product.can_fulfill(requested, now),
            current_stock: product.stock(),
            requested_quantity: requested,
            is_expired: product.is_expired(now),
        })
    }

    // -------------------------
    // Batch operations
    // -------------------------

    /// Check every line independently. Failures become `available = false`
    /// results; the batch itself never fails.
    pub fn batch_check_availability(&self, items: &[StockRequest]) -> BatchAvailability {
        let results: Vec<ItemAvailability> = items
            .iter()
            .map(|item| {
                match self.check_stock_availability(&item.product_id, item.quantity) {
                    Ok(a) => ItemAvailability::Checked(a),
                    Err(e) => ItemAvailability::failed(item.product_id.clone(), &e),
                }
            })
            .collect();

        BatchAvailability {
            all_available: results.iter().all(ItemAvailability::available),
            results,
        }
    }

    /// Reduce stock for every line, or for none.
    ///
    /// Lines are applied in order to staged copies; repeated product ids
    /// accumulate against the same copy. The first failing line aborts the
    /// batch with its error and nothing is written.
    pub fn batch_reduce_stock(
        &self,
        items: &[StockRequest],
        reason: Option<String>,
    ) -> DomainResult<BatchReduction> {
        let _guard = self.lock()?;
        let now = self.now();

        let mut staged: IndexMap<ProductId, Product> = IndexMap::new();
        let mut results = Vec::with_capacity(items.len());

        for (line, item) in items.iter().enumerate() {
            let product = match staged.entry(item.product_id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let product = self.product(&item.product_id).inspect_err(|e| {
                        tracing::warn!(line, "batch reduction aborted, nothing applied: {e}")
                    })?;
                    entry.insert(product)
                }
            };

            let change = self
                .reduce_staged(product, item.quantity, now)
                .inspect_err(|e| {
                    tracing::warn!(
                        line,
                        product_id = %item.product_id,
                        "batch reduction aborted, nothing applied: {e}"
                    )
                })?;
            results.push(change);
        }

        let batch = staged
            .into_values()
            .fold(WriteBatch::new(), |batch, product| batch.save(product));
        self.repository.commit(batch)?;

        tracing::info!(
            lines = items.len(),
            reason = reason.as_deref().unwrap_or(DEFAULT_REDUCE_REASON),
            "batch stock reduction committed"
        );
        Ok(BatchReduction {
            message: "Stock successfully reduced for all items".to_string(),
            results,
        })
    }

    // -------------------------
    // Alerts and reports
    // -------------------------

    pub fn low_stock_alert(&self) -> DomainResult<LowStockAlert> {
        let products: Vec<LowStockEntry> = self
            .repository
            .low_stock_products()?
            .iter()
            .map(LowStockEntry::from)
            .collect();

        Ok(LowStockAlert {
            alert_count: products.len(),
            products,
        })
    }

    pub fn expiry_alert(&self, days: i64) -> DomainResult<ExpiryAlert> {
        let _guard = self.lock()?;
        let now = self.now();

        let expiring_soon = self
            .repository
            .expiring_products(days, now)?
            .into_iter()
            .filter_map(|p| {
                let expiry_date = p.expiry_date()?;
                Some(ExpiringEntry {
                    days_until_expiry: p.days_until_expiry(now)?,
                    id: p.id_typed().clone(),
                    name: p.name().to_string(),
                    expiry_date,
                })
            })
            .collect();

        let expired = self
            .repository
            .expired_products(now)?
            .into_iter()
            .filter_map(|p| {
                Some(ExpiredEntry {
                    expiry_date: p.expiry_date()?,
                    id: p.id_typed().clone(),
                    name: p.name().to_string(),
                })
            })
            .collect();

        Ok(ExpiryAlert {
            window_days: days,
            expiring_soon,
            expired,
        })
    }

    pub fn restock_history(
        &self,
        product_id: Option<&ProductId>,
        limit: usize,
    ) -> DomainResult<Vec<RestockRecord>> {
        self.repository.restock_history(product_id, limit)
    }

    /// Totals and per-category breakdown, all computed from one snapshot.
    pub fn inventory_summary(&self) -> DomainResult<InventorySummary> {
        let snapshot = self.repository.find_all()?;
        InventorySummary::from_snapshot(&snapshot)
            .inspect_err(|e| tracing::warn!("inventory summary failed: {e}"))
    }
}
