use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use shelflife_api::app::{build_app, services::build_services};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(seed_sample_data: bool) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = Arc::new(build_services(seed_sample_data).expect("failed to build services"));
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.delete(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn days_from_today(days: i64) -> String {
    (Utc::now() + ChronoDuration::days(days))
        .date_naive()
        .to_string()
}

#[tokio::test]
async fn root_and_health_describe_the_service() {
    let srv = TestServer::spawn(false).await;

    let (status, body) = srv.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Inventory Management Service");
    assert_eq!(body["endpoints"]["products"], "/api/products");

    let (status, body) = srv.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn unknown_route_returns_not_found_envelope() {
    let srv = TestServer::spawn(false).await;

    let (status, body) = srv.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn seeded_catalog_lists_and_filters_by_category() {
    let srv = TestServer::spawn(true).await;

    let (status, body) = srv.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["id"], "P001");
    assert_eq!(products[0]["name"], "Nasi Goreng");
    assert_eq!(products[0]["is_low_stock"], false);

    let (_, body) = srv.get("/api/products?category=Snack").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Roti Bakar", "Pisang Goreng"]);

    let (status, body) = srv.get("/api/products/P404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn product_lifecycle_create_update_delete() {
    let srv = TestServer::spawn(false).await;

    let (status, body) = srv
        .post(
            "/api/products",
            json!({
                "name": "Kopi Susu",
                "category": "Minuman",
                "price": 8000,
                "stock": 25,
                "minStock": 8,
                "expiryDate": days_from_today(30),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["min_stock"], 8);
    assert_eq!(body["data"]["stock"], 25);

    // Defaults when optional fields are omitted.
    let (_, defaults) = srv
        .post("/api/products", json!({"name": "Air", "category": "Minuman", "price": 3000}))
        .await;
    assert_eq!(defaults["data"]["stock"], 0);
    assert_eq!(defaults["data"]["min_stock"], 5);
    assert_eq!(defaults["data"]["expiry_date"], Value::Null);
    assert_ne!(defaults["data"]["id"], body["data"]["id"]);

    // price = 0 is applied, expiry null clears.
    let (status, body) = srv
        .put(
            &format!("/api/products/{id}"),
            json!({"price": 0, "expiry_date": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 0);
    assert_eq!(body["data"]["expiry_date"], Value::Null);
    assert_eq!(body["data"]["name"], "Kopi Susu");

    let (status, body) = srv
        .put(&format!("/api/products/{id}"), json!({"name": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");

    let (status, body) = srv.delete(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product Kopi Susu successfully deleted");

    let (status, _) = srv.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = srv.delete(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_get_bad_request_envelopes() {
    let srv = TestServer::spawn(true).await;

    let res = srv
        .client
        .post(srv.url("/api/products"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);

    let (status, body) = srv
        .post("/api/products", json!({"name": "Negative", "price": -5}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = srv
        .post("/api/products/batch/reduce", json!({"items": "P001"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn restock_and_reduce_update_stock_and_history() {
    let srv = TestServer::spawn(true).await;

    let (status, body) = srv
        .post(
            "/api/products/P007/restock",
            json!({"quantity": 12, "reason": "Supplier delivery", "performedBy": "Sari"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["stock"], 20);
    assert_eq!(body["data"]["message"], "Added 12 units to Pisang Goreng. New stock: 20");

    let (status, body) = srv
        .post("/api/products/P007/reduce", json!({"quantity": 5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["stock"], 15);
    assert_eq!(
        body["data"]["message"],
        "Reduced 5 units from Pisang Goreng. Remaining stock: 15"
    );

    let (status, body) = srv
        .post("/api/products/P007/reduce", json!({"quantity": 100}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_stock");

    for quantity in [0, -4] {
        let (status, body) = srv
            .post("/api/products/P007/restock", json!({"quantity": quantity}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_quantity");
    }

    let (status, _) = srv
        .post("/api/products/P404/restock", json!({"quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = srv.get("/api/restock-history?productId=P007").await;
    assert_eq!(status, StatusCode::OK);
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["quantity"], 12);
    assert_eq!(history[0]["performed_by"], "Sari");
    assert_eq!(history[0]["reason"], "Supplier delivery");
}

#[tokio::test]
async fn restock_overflow_is_rejected_without_side_effects() {
    let srv = TestServer::spawn(false).await;

    let (status, body) = srv
        .post(
            "/api/products",
            json!({
                "name": "Gula Pasir",
                "category": "Gudang",
                "price": 1,
                "stock": u64::MAX - 5,
                "min_stock": u64::MAX,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = srv
        .post(&format!("/api/products/{id}/restock"), json!({"quantity": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "overflow");

    let (_, body) = srv.get(&format!("/api/products/{id}")).await;
    assert_eq!(body["data"]["stock"], u64::MAX - 5);
    let (_, body) = srv.get("/api/restock-history").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Threshold far above the stock still reports a positive deficit.
    let (_, body) = srv.get("/api/alerts/low-stock").await;
    assert_eq!(body["data"]["alert_count"], 1);
    assert_eq!(body["data"]["products"][0]["needs_restock"], 5);
}

#[tokio::test]
async fn restock_history_limit_returns_newest_first() {
    let srv = TestServer::spawn(true).await;

    for (id, quantity) in [("P001", 1), ("P002", 2), ("P001", 3), ("P003", 4), ("P002", 5)] {
        let (status, _) = srv
            .post(&format!("/api/products/{id}/restock"), json!({"quantity": quantity}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = srv.get("/api/restock-history?limit=2").await;
    let quantities: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["quantity"].as_i64().unwrap())
        .collect();
    assert_eq!(quantities, vec![5, 4]);

    let (_, body) = srv.get("/api/restock-history").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][0]["reason"], "Manual restock");
    assert_eq!(body["data"][0]["performed_by"], "Admin");
}

#[tokio::test]
async fn expired_products_are_unavailable_and_alerted() {
    let srv = TestServer::spawn(false).await;

    let (_, expired) = srv
        .post(
            "/api/products",
            json!({"name": "Roti Tawar", "category": "Snack", "price": 9000, "stock": 10, "expiry_date": days_from_today(-2)}),
        )
        .await;
    let expired_id = expired["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(expired["data"]["is_expired"], true);

    srv.post(
        "/api/products",
        json!({"name": "Susu Segar", "category": "Minuman", "price": 7000, "stock": 10, "expiry_date": days_from_today(3)}),
    )
    .await;
    srv.post(
        "/api/products",
        json!({"name": "Keju", "category": "Snack", "price": 20000, "stock": 10, "expiry_date": days_from_today(20)}),
    )
    .await;

    let (status, body) = srv
        .post(
            &format!("/api/products/{expired_id}/check-availability"),
            json!({"quantity": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["is_expired"], true);
    assert_eq!(body["data"]["current_stock"], 10);

    let (status, body) = srv
        .post(&format!("/api/products/{expired_id}/reduce"), json!({"quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "expired_product");

    let (_, body) = srv.get("/api/alerts/expiry").await;
    assert_eq!(body["data"]["window_days"], 7);
    assert_eq!(body["data"]["expiring_soon"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["expiring_soon"][0]["name"], "Susu Segar");
    assert_eq!(body["data"]["expired"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["expired"][0]["name"], "Roti Tawar");

    let (_, body) = srv.get("/api/alerts/expiry?days=30").await;
    assert_eq!(body["data"]["expiring_soon"].as_array().unwrap().len(), 2);

    let (status, _) = srv.get("/api/alerts/expiry?days=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_check_reports_each_item() {
    let srv = TestServer::spawn(true).await;

    let (status, body) = srv
        .post(
            "/api/products/batch/check-availability",
            json!({"items": [
                {"productId": "P001", "quantity": 5},
                {"product_id": "P006", "quantity": 50},
                {"productId": "P404", "quantity": 1},
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["all_available"], false);

    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["available"], true);
    assert_eq!(results[1]["available"], false);
    assert_eq!(results[1]["current_stock"], 12);
    assert_eq!(results[2]["available"], false);
    assert_eq!(results[2]["product_id"], "P404");
    assert!(results[2]["error"].as_str().unwrap().contains("P404"));

    let (_, body) = srv
        .post(
            "/api/products/batch/check-availability",
            json!({"items": [{"productId": "P003", "quantity": 50}]}),
        )
        .await;
    assert_eq!(body["all_available"], true);
}

#[tokio::test]
async fn batch_reduce_is_all_or_nothing() {
    let srv = TestServer::spawn(true).await;

    let (status, body) = srv
        .post(
            "/api/products/batch/reduce",
            json!({"items": [
                {"productId": "P006", "quantity": 12},
                {"productId": "P007", "quantity": 9},
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_stock");

    let (_, p6) = srv.get("/api/products/P006").await;
    let (_, p7) = srv.get("/api/products/P007").await;
    assert_eq!(p6["data"]["stock"], 12);
    assert_eq!(p7["data"]["stock"], 8);

    let (status, body) = srv
        .post(
            "/api/products/batch/reduce",
            json!({"items": [
                {"productId": "P006", "quantity": 2},
                {"productId": "P007", "quantity": 3},
            ], "reason": "Order #12"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stock successfully reduced for all items");
    assert_eq!(body["data"][0]["product"]["stock"], 10);
    assert_eq!(body["data"][1]["product"]["stock"], 5);
    assert_eq!(body["data"][1]["product"]["is_low_stock"], true);
}

#[tokio::test]
async fn low_stock_alert_and_summary_reflect_changes() {
    let srv = TestServer::spawn(true).await;

    let (_, body) = srv.get("/api/alerts/low-stock").await;
    assert_eq!(body["data"]["alert_count"], 0);

    srv.post("/api/products/P002/reduce", json!({"quantity": 12})).await;

    let (_, body) = srv.get("/api/alerts/low-stock").await;
    assert_eq!(body["data"]["alert_count"], 1);
    assert_eq!(body["data"]["products"][0]["id"], "P002");
    assert_eq!(body["data"]["products"][0]["current_stock"], 3);
    assert_eq!(body["data"]["products"][0]["needs_restock"], 2);

    let (status, body) = srv.get("/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"];
    assert_eq!(summary["total_products"], 8);
    assert_eq!(summary["low_stock_count"], 1);
    assert_eq!(summary["categories"]["Makanan Berat"]["count"], 2);
    assert_eq!(summary["categories"]["Makanan Berat"]["total_stock"], 20 + 3);
    assert_eq!(
        summary["categories"]["Makanan Berat"]["total_value"],
        15_000 * 20 + 12_000 * 3
    );
    assert_eq!(
        summary["total_stock_value"],
        15_000 * 20 + 12_000 * 3 + 5_000 * 50 + 3_000 * 100 + 8_000 * 25 + 10_000 * 12 + 7_000 * 8 + 4_000 * 30
    );
}

#[tokio::test]
async fn concurrent_reductions_over_http_never_oversell() {
    let srv = Arc::new(TestServer::spawn(true).await);

    // P007 starts at 8; 20 requests each take 1.
    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let srv = srv.clone();
            tokio::spawn(async move {
                srv.post("/api/products/P007/reduce", json!({"quantity": 1}))
                    .await
                    .0
            })
        })
        .collect();

    let mut ok = 0;
    for task in tasks {
        if task.await.unwrap() == StatusCode::OK {
            ok += 1;
        }
    }

    assert_eq!(ok, 8);
    let (_, body) = srv.get("/api/products/P007").await;
    assert_eq!(body["data"]["stock"], 0);
}
