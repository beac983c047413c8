use std::sync::Arc;

use axum::extract::{rejection::QueryRejection, Extension, Query};

use shelflife_core::ProductId;
use shelflife_infra::DEFAULT_HISTORY_LIMIT;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn restock_history(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::HistoryQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    let product_id = query.product_id.map(ProductId::from);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    match services
        .inventory()
        .restock_history(product_id.as_ref(), limit)
    {
        Ok(history) => dto::ok(history),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory().inventory_summary() {
        Ok(summary) => dto::ok(summary),
        Err(e) => errors::domain_error_to_response(e),
    }
}
