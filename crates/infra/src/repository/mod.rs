//! Product storage abstraction.
//!
//! `InventoryService` depends only on `ProductRepository`; the in-memory
//! implementation here can be swapped for a durable backend without touching
//! the service layer.

pub mod in_memory;

pub use in_memory::InMemoryProductRepository;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use shelflife_core::{DomainResult, ProductId};
use shelflife_inventory::{Product, RestockRecord};

/// A group of writes that must land together.
///
/// Implementations apply every product upsert and every history append in a
/// batch atomically: either all are visible afterwards or none are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    products: Vec<Product>,
    restocks: Vec<RestockRecord>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn append_restock(mut self, record: RestockRecord) -> Self {
        self.restocks.push(record);
        self
    }

    pub fn restocks(&self) -> &[RestockRecord] {
        &self.restocks
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.restocks.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Product>, Vec<RestockRecord>) {
        (self.products, self.restocks)
    }
}

/// Product + restock-history store contract.
///
/// - Listings preserve insertion order of the product mapping.
/// - Each method observes a single point in time (scans never mix pre- and
///   post-write values of the same product).
/// - Time-dependent scans take `now` explicitly and are evaluated fresh on
///   every call.
pub trait ProductRepository: Send + Sync {
    fn find_all(&self) -> DomainResult<Vec<Product>>;

    fn find_by_id(&self, id: &ProductId) -> DomainResult<Option<Product>>;

    fn find_by_category(&self, category: &str) -> DomainResult<Vec<Product>>;

    /// Upsert by id. An existing product keeps its position in listings.
    fn save(&self, product: Product) -> DomainResult<Product>;

    /// Remove the product. Returns whether an entry existed. History is untouched.
    fn delete(&self, id: &ProductId) -> DomainResult<bool>;

    /// Append to the restock log. Existing entries are never rewritten.
    fn add_restock_record(&self, record: RestockRecord) -> DomainResult<()>;

    /// The `limit` most recent records (optionally for one product), newest first.
    fn restock_history(
        &self,
        product_id: Option<&ProductId>,
        limit: usize,
    ) -> DomainResult<Vec<RestockRecord>>;

    fn low_stock_products(&self) -> DomainResult<Vec<Product>>;

    fn expiring_products(&self, days: i64, now: DateTime<Utc>) -> DomainResult<Vec<Product>>;

    fn expired_products(&self, now: DateTime<Utc>) -> DomainResult<Vec<Product>>;

    /// Apply a `WriteBatch` atomically.
    fn commit(&self, batch: WriteBatch) -> DomainResult<()>;
}

impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    fn find_all(&self) -> DomainResult<Vec<Product>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: &ProductId) -> DomainResult<Option<Product>> {
        (**self).find_by_id(id)
    }

    fn find_by_category(&self, category: &str) -> DomainResult<Vec<Product>> {
        (**self).find_by_category(category)
    }

    fn save(&self, product: Product) -> DomainResult<Product> {
        (**self).save(product)
    }

    fn delete(&self, id: &ProductId) -> DomainResult<bool> {
        (**self).delete(id)
    }

    fn add_restock_record(&self, record: RestockRecord) -> DomainResult<()> {
        (**self).add_restock_record(record)
    }

    fn restock_history(
        &self,
        product_id: Option<&ProductId>,
        limit: usize,
    ) -> DomainResult<Vec<RestockRecord>> {
        (**self).restock_history(product_id, limit)
    }

    fn low_stock_products(&self) -> DomainResult<Vec<Product>> {
        (**self).low_stock_products()
    }

    fn expiring_products(&self, days: i64, now: DateTime<Utc>) -> DomainResult<Vec<Product>> {
        (**self).expiring_products(days, now)
    }

    fn expired_products(&self, now: DateTime<Utc>) -> DomainResult<Vec<Product>> {
        (**self).expired_products(now)
    }

    fn commit(&self, batch: WriteBatch) -> DomainResult<()> {
        (**self).commit(batch)
    }
}
