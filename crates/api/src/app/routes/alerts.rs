use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    routing::get,
    Router,
};

use shelflife_infra::DEFAULT_EXPIRY_WINDOW_DAYS;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/low-stock", get(low_stock))
        .route("/expiry", get(expiry))
}

pub async fn low_stock(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory().low_stock_alert() {
        Ok(alert) => dto::ok(alert),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `?days=N` sets the look-ahead window (default 7).
pub async fn expiry(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ExpiryQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    let days = query.days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    match services.inventory().expiry_alert(days) {
        Ok(alert) => dto::ok(alert),
        Err(e) => errors::domain_error_to_response(e),
    }
}
