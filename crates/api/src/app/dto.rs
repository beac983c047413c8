use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shelflife_infra::StockRequest;
use shelflife_infra::reports::{BatchReduction, StockChange};
use shelflife_inventory::{NewProduct, Product, ProductUpdate};

// -------------------------
// Request DTOs
// -------------------------

// Field names are snake_case; the camelCase spellings are accepted as aliases.

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Whole currency units; `12.5` is rejected.
    pub price: u64,
    pub stock: Option<u64>,
    #[serde(alias = "minStock")]
    pub min_stock: Option<u64>,
    #[serde(alias = "expiryDate")]
    pub expiry_date: Option<NaiveDate>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(body: CreateProductRequest) -> Self {
        NewProduct {
            name: body.name,
            category: body.category,
            price: body.price,
            stock: body.stock,
            min_stock: body.min_stock,
            expiry_date: body.expiry_date,
        }
    }
}

/// Partial update. An absent field is left alone; `"expiry_date": null`
/// clears the expiry date.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<u64>,
    #[serde(alias = "minStock")]
    pub min_stock: Option<u64>,
    #[serde(
        default,
        alias = "expiryDate",
        with = "::serde_with::rust::double_option"
    )]
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(body: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: body.name,
            category: body.category,
            price: body.price,
            min_stock: body.min_stock,
            expiry_date: body.expiry_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: i64,
    pub reason: Option<String>,
    #[serde(alias = "performedBy")]
    pub performed_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReduceStockRequest {
    pub quantity: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct BatchItemRequest {
    #[serde(alias = "productId")]
    pub product_id: String,
    pub quantity: i64,
}

impl From<BatchItemRequest> for StockRequest {
    fn from(item: BatchItemRequest) -> Self {
        StockRequest::new(item.product_id, item.quantity)
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchCheckRequest {
    pub items: Vec<BatchItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BatchReduceRequest {
    pub items: Vec<BatchItemRequest>,
    pub reason: Option<String>,
}

// -------------------------
// Query parameters
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpiryQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(alias = "productId")]
    pub product_id: Option<String>,
    pub limit: Option<usize>,
}

// -------------------------
// Response mapping
// -------------------------

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

/// `{"success": true, "data": ...}` with the given status.
///
/// Serialized straight to the body, so `u128` totals above `u64::MAX` stay exact.
pub fn success(status: StatusCode, data: impl Serialize) -> axum::response::Response {
    (
        status,
        axum::Json(Envelope {
            success: true,
            data,
        }),
    )
        .into_response()
}

pub fn ok(data: impl Serialize) -> axum::response::Response {
    success(StatusCode::OK, data)
}

/// Product fields plus the time-dependent flags evaluated at `now`.
pub fn product_to_json(p: &Product, now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed(),
        "name": p.name(),
        "category": p.category(),
        "price": p.price(),
        "stock": p.stock(),
        "min_stock": p.min_stock(),
        "expiry_date": p.expiry_date(),
        "created_at": p.created_at().to_rfc3339(),
        "updated_at": p.updated_at().to_rfc3339(),
        "is_low_stock": p.is_low_stock(),
        "is_expired": p.is_expired(now),
    })
}

pub fn products_to_json(products: &[Product], now: DateTime<Utc>) -> serde_json::Value {
    serde_json::Value::Array(products.iter().map(|p| product_to_json(p, now)).collect())
}

pub fn stock_change_to_json(change: &StockChange, now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "product": product_to_json(&change.product, now),
        "message": change.message,
    })
}

pub fn batch_reduction_to_json(batch: &BatchReduction, now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": batch.message,
        "data": batch
            .results
            .iter()
            .map(|c| stock_change_to_json(c, now))
            .collect::<Vec<_>>(),
    })
}
