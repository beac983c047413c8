use axum::{routing::get, Router};

pub mod alerts;
pub mod batch;
pub mod products;
pub mod reports;
pub mod stock;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest(
            "/products",
            products::router().merge(stock::router()).merge(batch::router()),
        )
        .nest("/alerts", alerts::router())
        .route("/restock-history", get(reports::restock_history))
        .route("/summary", get(reports::summary))
}
