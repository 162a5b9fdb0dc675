//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::InMemoryOrderStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state(InMemoryOrderStore::new(), "memory");
    api::create_app(state, get_metrics_handle())
}

fn post_order(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/orders")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn iphone_order() -> serde_json::Value {
    serde_json::json!({
        "customer_id": 1,
        "items": [{"product_id": 2, "quantity": 1, "amount": 4800.12}],
        "payments": [{"amount": 4800.12, "method": "CREDIT"}]
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
}

#[tokio::test]
async fn test_sell_order() {
    let app = setup();

    let response = app.oneshot(post_order(iphone_order())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["order_id"], 1);
    assert_eq!(json["status"], "CONFIRMED");
}

#[tokio::test]
async fn test_sell_and_get_order() {
    let app = setup();

    let created = app
        .clone()
        .oneshot(post_order(iphone_order()))
        .await
        .unwrap();
    let order_id = json_body(created).await["order_id"].as_i64().unwrap();

    let response = app
        .oneshot(get(&format!("/api/v1/orders/{order_id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["id"], order_id);
    assert_eq!(json["customer_id"], 1);
    assert_eq!(json["status"], "CONFIRMED");
    assert_eq!(json["items"][0]["product_id"], 2);
    assert_eq!(json["items"][0]["quantity"], 1);
    assert_eq!(json["total_amount"], 4800.12);
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_list_orders() {
    let app = setup();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_order(iphone_order()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/api/v1/orders")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[1]["id"], 2);
}

#[tokio::test]
async fn test_amount_mismatch_is_bad_request() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(post_order(serde_json::json!({
            "customer_id": 1,
            "items": [{"product_id": 1, "quantity": 2, "amount": 5800.99}],
            "payments": [{"amount": 5800.99}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("does not match"));

    // Nothing was persisted
    let list = app.oneshot(get("/api/v1/orders")).await.unwrap();
    assert_eq!(json_body(list).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_order_without_items_is_bad_request() {
    let app = setup();

    let response = app
        .oneshot(post_order(serde_json::json!({
            "customer_id": 1,
            "payments": [{"amount": 10.0}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Validation error: Order has no items");
}

#[tokio::test]
async fn test_unknown_payment_method_is_bad_request() {
    let app = setup();

    let mut body = iphone_order();
    body["payments"][0]["method"] = serde_json::json!("BARTER");
    let response = app.oneshot(post_order(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejected_payment_leaves_order_pending() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(post_order(serde_json::json!({
            "customer_id": 1,
            "items": [{"product_id": 1, "quantity": 1, "amount": 0.0}],
            "payments": [{"amount": 0.0}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let response = app.oneshot(get("/api/v1/orders/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "PENDING");
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let app = setup();

    let response = app.oneshot(get("/api/v1/orders/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Order 999 not found");
}

#[tokio::test]
async fn test_invalid_order_id_format() {
    let app = setup();

    let response = app.oneshot(get("/api/v1/orders/not-a-number")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_sales() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(post_order(iphone_order()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("sell_attempts_total"), "{text}");
    assert!(text.contains("orders_sold_total"), "{text}");
}
