use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;

use crate::app::errors;
use crate::app::services::AppServices;

const SERVICE_NAME: &str = "Inventory Management Service";

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "products": "/api/products",
            "alerts": "/api/alerts",
            "restock_history": "/api/restock-history",
            "summary": "/api/summary",
        },
    }))
}

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": services.uptime_secs(),
    }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "Endpoint not found")
}
