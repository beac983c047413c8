use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use shelflife_core::{DomainError, DomainResult, Entity, ProductId};
use shelflife_inventory::{Product, RestockRecord};

use super::{ProductRepository, WriteBatch};

#[derive(Debug, Default)]
struct Inventory {
    products: IndexMap<ProductId, Product>,
    history: Vec<RestockRecord>,
}

/// In-memory product store.
///
/// One `RwLock` guards both the product mapping and the restock log, so a
/// scan holds a consistent view for its whole duration and a `commit` is
/// visible all at once. State lives for the process lifetime only.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<Inventory>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store (e.g. with a sample catalog). Later duplicates win.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| (p.id().clone(), p))
            .collect();
        Self {
            inner: RwLock::new(Inventory {
                products,
                history: Vec::new(),
            }),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Inventory>> {
        self.inner
            .read()
            .map_err(|_| DomainError::storage("product store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Inventory>> {
        self.inner
            .write()
            .map_err(|_| DomainError::storage("product store lock poisoned"))
    }

    fn scan(&self, keep: impl Fn(&Product) -> bool) -> DomainResult<Vec<Product>> {
        let inventory = self.read()?;
        Ok(inventory
            .products
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect())
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn find_all(&self) -> DomainResult<Vec<Product>> {
        self.scan(|_| true)
    }

    fn find_by_id(&self, id: &ProductId) -> DomainResult<Option<Product>> {
        Ok(self.read()?.products.get(id).cloned())
    }

    fn find_by_category(&self, category: &str) -> DomainResult<Vec<Product>> {
        self.scan(|p| p.category() == category)
    }

    fn save(&self, product: Product) -> DomainResult<Product> {
        let mut inventory = self.write()?;
        inventory.products.insert(product.id().clone(), product.clone());
        Ok(product)
    }

    fn delete(&self, id: &ProductId) -> DomainResult<bool> {
        let mut inventory = self.write()?;
        Ok(inventory.products.shift_remove(id).is_some())
    }

    fn add_restock_record(&self, record: RestockRecord) -> DomainResult<()> {
        self.write()?.history.push(record);
        Ok(())
    }

    fn restock_history(
        &self,
        product_id: Option<&ProductId>,
        limit: usize,
    ) -> DomainResult<Vec<RestockRecord>> {
        let inventory = self.read()?;
        let matching: Vec<&RestockRecord> = inventory
            .history
            .iter()
            .filter(|r| product_id.is_none_or(|id| r.product_id() == id))
            .collect();

        let start = matching.len().saturating_sub(limit);
        Ok(matching[start..].iter().rev().map(|r| (*r).clone()).collect())
    }

    fn low_stock_products(&self) -> DomainResult<Vec<Product>> {
        self.scan(Product::is_low_stock)
    }

    fn expiring_products(&self, days: i64, now: DateTime<Utc>) -> DomainResult<Vec<Product>> {
        self.scan(|p| p.is_expiring_soon(days, now))
    }

    fn expired_products(&self, now: DateTime<Utc>) -> DomainResult<Vec<Product>> {
        self.scan(|p| p.is_expired(now))
    }

    fn commit(&self, batch: WriteBatch) -> DomainResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let (products, restocks) = batch.into_parts();
        let mut inventory = self.write()?;
        for product in products {
            inventory.products.insert(product.id().clone(), product);
        }
        inventory.history.extend(restocks);
        Ok(())
    }
}
