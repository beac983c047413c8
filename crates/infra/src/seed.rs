//! Sample catalog loaded at startup when seeding is enabled.

use chrono::{DateTime, Utc};

use shelflife_core::{DomainResult, ProductId};
use shelflife_inventory::{NewProduct, Product};

use crate::repository::InMemoryProductRepository;

// (id, name, category, price, stock, min_stock)
const SAMPLE_CATALOG: [(&str, &str, &str, u64, u64, u64); 8] = [
    ("P001", "Nasi Goreng", "Makanan Berat", 15_000, 20, 5),
    ("P002", "Mie Ayam", "Makanan Berat", 12_000, 15, 5),
    ("P003", "Teh Botol", "Minuman", 5_000, 50, 10),
    ("P004", "Air Mineral", "Minuman", 3_000, 100, 20),
    ("P005", "Kopi Susu", "Minuman", 8_000, 25, 8),
    ("P006", "Roti Bakar", "Snack", 10_000, 12, 5),
    ("P007", "Pisang Goreng", "Snack", 7_000, 8, 5),
    ("P008", "Es Teh Manis", "Minuman", 4_000, 30, 10),
];

pub fn sample_products(now: DateTime<Utc>) -> DomainResult<Vec<Product>> {
    SAMPLE_CATALOG
        .iter()
        .map(|&(id, name, category, price, stock, min_stock)| {
            Product::new(
                ProductId::from(id),
                NewProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    price,
                    stock: Some(stock),
                    min_stock: Some(min_stock),
                    expiry_date: None,
                },
                now,
            )
        })
        .collect()
}

/// Repository pre-filled with the sample catalog.
pub fn seeded_repository(now: DateTime<Utc>) -> DomainResult<InMemoryProductRepository> {
    let products = sample_products(now)?;
    tracing::info!(count = products.len(), "seeded sample catalog");
    Ok(InMemoryProductRepository::with_products(products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ProductRepository;

    #[test]
    fn sample_catalog_has_three_categories_in_order() {
        let repo = seeded_repository(Utc::now()).unwrap();
        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].id_typed().as_str(), "P001");
        assert_eq!(all[7].id_typed().as_str(), "P008");

        assert_eq!(repo.find_by_category("Makanan Berat").unwrap().len(), 2);
        assert_eq!(repo.find_by_category("Minuman").unwrap().len(), 4);
        assert_eq!(repo.find_by_category("Snack").unwrap().len(), 2);
    }

    #[test]
    fn nothing_in_the_sample_catalog_starts_low() {
        let repo = seeded_repository(Utc::now()).unwrap();
        assert!(repo.low_stock_products().unwrap().is_empty());
    }
}
