use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use shelflife_core::DomainResult;
use shelflife_infra::repository::{InMemoryProductRepository, ProductRepository};
use shelflife_infra::{InventoryService, seed};

pub type SharedRepository = Arc<dyn ProductRepository>;

/// Everything the HTTP handlers need, shared behind one `Arc`.
pub struct AppServices {
    inventory: InventoryService<SharedRepository>,
    started: Instant,
}

impl AppServices {
    pub fn new(inventory: InventoryService<SharedRepository>) -> Self {
        Self {
            inventory,
            started: Instant::now(),
        }
    }

    pub fn inventory(&self) -> &InventoryService<SharedRepository> {
        &self.inventory
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inventory.now()
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// In-memory wiring, optionally pre-loaded with the sample catalog.
pub fn build_services(seed_sample_data: bool) -> DomainResult<AppServices> {
    let repository: SharedRepository = if seed_sample_data {
        Arc::new(seed::seeded_repository(Utc::now())?)
    } else {
        Arc::new(InMemoryProductRepository::new())
    };

    Ok(AppServices::new(InventoryService::new(repository)))
}
