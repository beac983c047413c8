use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use shelflife_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ProductListQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    let inventory = services.inventory();
    let products = match &query.category {
        Some(category) => inventory.products_by_category(category),
        None => inventory.all_products(),
    };

    match products {
        Ok(products) => dto::ok(dto::products_to_json(&products, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.inventory().product(&ProductId::from(id)) {
        Ok(p) => dto::ok(dto::product_to_json(&p, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.inventory().create_product(body.into()) {
        Ok(p) => dto::success(StatusCode::CREATED, dto::product_to_json(&p, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services
        .inventory()
        .update_product(&ProductId::from(id), body.into())
    {
        Ok(p) => dto::ok(dto::product_to_json(&p, services.now())),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.inventory().delete_product(&ProductId::from(id)) {
        Ok(message) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": message,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
