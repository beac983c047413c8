use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::post,
    Json, Router,
};

use shelflife_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:id/restock", post(restock))
        .route("/:id/reduce", post(reduce))
        .route("/:id/check-availability", post(check_availability))
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::RestockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.inventory().add_stock(
        &ProductId::from(id),
        body.quantity,
        body.reason,
        body.performed_by,
    ) {
        Ok(change) => dto::ok(dto::stock_change_to_json(&change, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reduce(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ReduceStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services
        .inventory()
        .reduce_stock(&ProductId::from(id), body.quantity, body.reason)
    {
        Ok(change) => dto::ok(dto::stock_change_to_json(&change, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn check_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AvailabilityRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services
        .inventory()
        .check_stock_availability(&ProductId::from(id), body.quantity)
    {
        Ok(availability) => dto::ok(availability),
        Err(e) => errors::domain_error_to_response(e),
    }
}
