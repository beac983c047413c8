use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use shelflife_core::{DomainError, DomainResult, Entity, ProductId};

/// Low-stock threshold applied when a product is created without one.
pub const DEFAULT_MIN_STOCK: u64 = 5;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Entity: Product.
///
/// `price` is an integer count of whole units of the shop's single currency
/// (IDR in the sample catalog); fractional prices are not representable.
/// Every derived predicate takes `now` explicitly; nothing time-dependent is
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    price: u64,
    stock: u64,
    min_stock: u64,
    expiry_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for creating a product. `None` fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: u64,
    pub stock: Option<u64>,
    pub min_stock: Option<u64>,
    pub expiry_date: Option<NaiveDate>,
}

/// Partial update. A `Some` field is applied even when its value is falsy
/// (`price: Some(0)`); `expiry_date: Some(None)` clears the expiry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<u64>,
    pub min_stock: Option<u64>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.min_stock.is_none()
            && self.expiry_date.is_none()
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid_input("name cannot be empty"));
    }
    Ok(())
}

/// Start of the expiry day in UTC. A product is still sellable up to that instant.
fn expiry_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `ceil(millis / 1 day)`; integer division already rounds negatives up.
fn ceil_days(millis: i64) -> i64 {
    if millis > 0 {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    } else {
        millis / MILLIS_PER_DAY
    }
}

impl Product {
    pub fn new(id: ProductId, data: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_name(&data.name)?;

        Ok(Self {
            id,
            name: data.name,
            category: data.category,
            price: data.price,
            stock: data.stock.unwrap_or(0),
            min_stock: data.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            expiry_date: data.expiry_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn min_stock(&self) -> u64 {
        self.min_stock
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `price × stock`. Exact: the product of two `u64` always fits a `u128`.
    pub fn stock_value(&self) -> u128 {
        u128::from(self.price) * u128::from(self.stock)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Stock needed to get back to the threshold. Negative when not low on stock.
    pub fn restock_deficit(&self) -> i128 {
        i128::from(self.min_stock) - i128::from(self.stock)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date
            .map(|date| expiry_instant(date) < now)
            .unwrap_or(false)
    }

    /// Whole days until expiry, rounded up. `None` for products that never expire.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expiry_date
            .map(|date| ceil_days((expiry_instant(date) - now).num_milliseconds()))
    }

    pub fn is_expiring_soon(&self, days: i64, now: DateTime<Utc>) -> bool {
        match self.days_until_expiry(now) {
            Some(left) => left > 0 && left <= days,
            None => false,
        }
    }

    pub fn can_fulfill(&self, quantity: u64, now: DateTime<Utc>) -> bool {
        self.stock >= quantity && !self.is_expired(now)
    }

    /// Take `quantity` units out of stock.
    ///
    /// Expiry is checked first so callers can tell an expired product apart
    /// from one that is merely short on stock. On error the product is unchanged.
    pub fn reduce_stock(&mut self, quantity: u64, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(expiry_date) = self.expiry_date.filter(|_| self.is_expired(now)) {
            return Err(DomainError::ExpiredProduct {
                product_id: self.id.clone(),
                expiry_date,
            });
        }
        if quantity > self.stock {
            return Err(DomainError::InsufficientStock {
                product_id: self.id.clone(),
                requested: quantity,
                available: self.stock,
            });
        }

        self.stock -= quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Put `quantity` units into stock. Positivity is the caller's concern.
    ///
    /// Fails with `Overflow` when the new count would not fit a `u64`; the
    /// product is unchanged in that case.
    pub fn add_stock(&mut self, quantity: u64, now: DateTime<Utc>) -> DomainResult<()> {
        let stock = self.stock.checked_add(quantity).ok_or_else(|| {
            DomainError::overflow(format!(
                "stock of {} is {} and cannot take {quantity} more",
                self.id, self.stock
            ))
        })?;
        self.stock = stock;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_min_stock(&mut self, min_stock: u64, now: DateTime<Utc>) {
        self.min_stock = min_stock;
        self.updated_at = now;
    }

    /// Apply the fields present in `update`. Validation happens before any
    /// field is touched, so a rejected update leaves the product as it was.
    pub fn apply_update(&mut self, update: ProductUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(expiry_date) = update.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(min_stock) = update.min_stock {
            self.update_min_stock(min_stock, now);
        }

        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
