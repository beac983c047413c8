use chrono::{DateTime, Utc};
use serde::Serialize;

use shelflife_core::{DomainError, DomainResult, Entity, ProductId, RestockId};

/// Audit entry written whenever stock goes up.
///
/// Holds the product id by value only: the record outlives the product if the
/// product is later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockRecord {
    id: RestockId,
    product_id: ProductId,
    quantity: u64,
    reason: String,
    performed_by: String,
    timestamp: DateTime<Utc>,
}

impl RestockRecord {
    pub fn new(
        product_id: ProductId,
        quantity: u64,
        reason: impl Into<String>,
        performed_by: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(0));
        }
        Ok(Self {
            id: RestockId::new(),
            product_id,
            quantity,
            reason: reason.into(),
            performed_by: performed_by.into(),
            timestamp,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn performed_by(&self) -> &str {
        &self.performed_by
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Entity for RestockRecord {
    type Id = RestockId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
