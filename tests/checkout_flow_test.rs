//! Integration tests for the checkout flow.
//!
//! Tests cover:
//! - Checkout creating a pending order with server-side totals
//! - Id formats
//! - Body validation and missing fields

mod common;

use axum::http::Method;
use common::{checkout_payload, response_json, TestApp};
use regex::Regex;
use serde_json::{json, Value};

#[tokio::test]
async fn checkout_returns_well_formed_ids() {
    let app = TestApp::new();

    let response = app.post("/checkout", checkout_payload("upi")).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Checkout initialized successfully"));

    let txn = Regex::new(r"^TXN\d{8}$").unwrap();
    let order = Regex::new(r"^FARM\d+$").unwrap();
    assert!(txn.is_match(body["transaction_id"].as_str().unwrap()));
    assert!(order.is_match(body["order_id"].as_str().unwrap()));
}

#[tokio::test]
async fn checkout_order_is_pending_with_recomputed_total() {
    let app = TestApp::new();

    let mut payload = checkout_payload("cod");
    payload["total"] = json!(1);
    let response = app.post("/checkout", payload).await;
    assert_eq!(response.status(), 200);
    let transaction_id = response_json(response).await["transaction_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.get(&format!("/order_status/{}", transaction_id)).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));

    let order = &body["order"];
    assert_eq!(order["status"], json!("pending"));
    assert_eq!(order["total"].as_f64(), Some(210.0));
    assert_eq!(order["customer"]["pincode"], json!("627001"));
    assert_eq!(order["cart"][0]["name"], json!("Bananas"));
    assert!(order.get("payment_timestamp").is_none());
    assert!(order["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn checkout_reports_missing_fields_in_order() {
    let app = TestApp::new();

    let response = app.post("/checkout", json!({"phone": "9840012345"})).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing field: name"));

    let mut payload = checkout_payload("upi");
    payload["total"] = Value::Null;
    let body = response_json(app.post("/checkout", payload).await).await;
    assert_eq!(body["error"], json!("Missing field: total"));

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn checkout_rejects_total_out_of_range() {
    let app = TestApp::new();

    let mut payload = checkout_payload("upi");
    payload["cart"] = json!([{"name": "Saffron", "price": 1e28, "quantity": 100}]);
    let response = app.post("/checkout", payload).await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid cart: total out of range"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn checkout_totals_fractional_and_negative_quantities() {
    let app = TestApp::new();

    let mut payload = checkout_payload("cod");
    payload["cart"] = json!([
        {"name": "Ghee", "price": 40, "quantity": 0.5},
        {"name": "Rice", "price": 100, "quantity": 2},
        {"name": "Return", "price": 50, "quantity": -1}
    ]);
    let response = app.post("/checkout", payload).await;
    assert_eq!(response.status(), 200);
    let transaction_id = response_json(response).await["transaction_id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = response_json(app.get(&format!("/order_status/{}", transaction_id)).await).await;
    // (20 + 200 - 50) * 1.05 = 178.50
    assert_eq!(body["order"]["total"].as_f64(), Some(178.5));
}

#[tokio::test]
async fn checkout_requires_json_content_type() {
    let app = TestApp::new();

    let response = app
        .request_raw(Method::POST, "/checkout", "name=Ravi", Some("text/plain"))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Content-Type must be application/json"));

    let response = app
        .request_raw(Method::POST, "/checkout", "{not json", Some("application/json"))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn checkout_rejects_non_object_bodies() {
    let app = TestApp::new();

    let response = app.post("/checkout", json!([1, 2, 3])).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Request body must be a JSON object"));

    let mut payload = checkout_payload("upi");
    payload["cart"] = json!({"price": 1});
    let response = app.post("/checkout", payload).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid cart"));
}

#[tokio::test]
async fn health_counts_created_orders() {
    let app = TestApp::new();

    app.checkout("upi").await;
    app.checkout("card").await;
    app.post("/checkout", json!({})).await;
    app.post("/api/orders", json!({})).await;

    let body = response_json(app.get("/health").await).await;
    assert_eq!(body["orders_count"], json!(3));
}
