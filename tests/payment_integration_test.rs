//! Integration tests for the simulated payment gateway.

mod common;

use common::{response_json, TestApp};
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn upi_payment_with_valid_pin_succeeds() {
    let app = TestApp::new();
    let (transaction_id, order_id) = app.checkout("upi").await;

    let response = app
        .post(
            "/process_payment",
            json!({"transaction_id": transaction_id, "upi_pin": "123456"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Payment successful"));
    assert_eq!(body["status"], json!("paid"));
    assert_eq!(body["order_id"], json!(order_id));
    assert_eq!(body["transaction_id"], json!(transaction_id));

    let status = response_json(app.get(&format!("/order_status/{}", transaction_id)).await).await;
    assert_eq!(status["order"]["status"], json!("paid"));
    assert_eq!(status["order"]["payment_status"], json!("completed"));
    assert!(status["order"]["payment_timestamp"].as_str().is_some());
}

#[rstest]
#[case(json!("12345"))]
#[case(json!("abcdef"))]
#[case(json!("1234567"))]
#[tokio::test]
async fn upi_payment_with_malformed_pin_is_rejected(#[case] pin: serde_json::Value) {
    let app = TestApp::new();
    let (transaction_id, _) = app.checkout("upi").await;

    let response = app
        .post(
            "/process_payment",
            json!({"transaction_id": transaction_id, "upi_pin": pin}),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Invalid UPI PIN"));

    let status = response_json(app.get(&format!("/order_status/{}", transaction_id)).await).await;
    assert_eq!(status["order"]["status"], json!("pending"));
}

#[tokio::test]
async fn card_payment_with_bad_otp_is_declined_with_200() {
    let app = TestApp::new();
    let (transaction_id, _) = app.checkout("card").await;

    let response = app
        .post(
            "/process_payment",
            json!({
                "transaction_id": transaction_id,
                "card_number": "4111111111111111",
                "card_holder": "Ravi Kumar",
                "expiry": "12/27",
                "cvv": "123",
                "otp": "12"
            }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Payment failed. Please try again."));
    assert_eq!(body["status"], json!("payment_failed"));

    let status = response_json(app.get(&format!("/order_status/{}", transaction_id)).await).await;
    assert_eq!(status["order"]["status"], json!("payment_failed"));
}

#[rstest]
#[case("card_number")]
#[case("card_holder")]
#[case("expiry")]
#[case("cvv")]
#[case("otp")]
#[tokio::test]
async fn card_payment_requires_every_field(#[case] missing: &str) {
    let app = TestApp::new();
    let (transaction_id, _) = app.checkout("card").await;

    let mut payload = json!({
        "transaction_id": transaction_id,
        "card_number": "4111111111111111",
        "card_holder": "Ravi Kumar",
        "expiry": "12/27",
        "cvv": "123",
        "otp": "654321"
    });
    payload.as_object_mut().unwrap().remove(missing);

    let response = app.post("/process_payment", payload).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!(format!("Missing card field: {}", missing)));
}

#[rstest]
#[case("upi")]
#[case("card")]
#[case("cod")]
#[case("netbanking")]
#[tokio::test]
async fn unknown_transaction_is_404_for_every_method(#[case] method: &str) {
    let app = TestApp::new();
    app.checkout(method).await;

    let response = app
        .post(
            "/process_payment",
            json!({"transaction_id": "TXN00000000", "upi_pin": "123456", "otp": "123456"}),
        )
        .await;
    assert_eq!(response.status(), 404);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Order not found"));
}

#[tokio::test]
async fn missing_transaction_id_is_400() {
    let app = TestApp::new();
    let response = app.post("/process_payment", json!({"upi_pin": "123456"})).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Transaction ID required"));
}

#[rstest]
#[case("cod")]
#[case("netbanking")]
#[tokio::test]
async fn offline_methods_succeed_and_cannot_be_repeated(#[case] method: &str) {
    let app = TestApp::new();
    let (transaction_id, order_id) = app.checkout(method).await;
    let payload = json!({"transaction_id": transaction_id});

    let response = app.post("/process_payment", payload.clone()).await;
    assert_eq!(response.status(), 200);

    let response = app.post("/process_payment", payload).await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(
        body["error"],
        json!(format!("Order {} is not awaiting payment (status: paid)", order_id))
    );

    let status = response_json(app.get(&format!("/order_status/{}", transaction_id)).await).await;
    assert_eq!(status["order"]["status"], json!("paid"));
}

#[tokio::test]
async fn unsupported_method_is_rejected_at_payment_time() {
    let app = TestApp::new();
    let (transaction_id, _) = app.checkout("wallet").await;

    let response = app
        .post("/process_payment", json!({"transaction_id": transaction_id}))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Invalid payment method"));
}

#[tokio::test]
async fn concurrent_payments_settle_once() {
    let app = TestApp::new();
    let (transaction_id, _) = app.checkout("cod").await;
    let payload = json!({"transaction_id": transaction_id});

    let (first, second) = tokio::join!(
        app.post("/process_payment", payload.clone()),
        app.post("/process_payment", payload.clone())
    );
    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 400]);
}
