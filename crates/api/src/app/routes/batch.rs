//! Multi-item endpoints used by the ordering side.
//!
//! Availability checks report every line independently. Reductions are
//! all-or-nothing: a failing line returns its error and no stock changes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use shelflife_infra::StockRequest;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/batch/check-availability", post(check_availability))
        .route("/batch/reduce", post(reduce))
}

fn into_requests(items: Vec<dto::BatchItemRequest>) -> Vec<StockRequest> {
    items.into_iter().map(StockRequest::from).collect()
}

pub async fn check_availability(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::BatchCheckRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let batch = services
        .inventory()
        .batch_check_availability(&into_requests(body.items));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "all_available": batch.all_available,
            "data": batch.results,
        })),
    )
        .into_response()
}

pub async fn reduce(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::BatchReduceRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services
        .inventory()
        .batch_reduce_stock(&into_requests(body.items), body.reason)
    {
        Ok(batch) => (
            StatusCode::OK,
            Json(dto::batch_reduction_to_json(&batch, services.now())),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
