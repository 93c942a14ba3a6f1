#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use farmlink_api::{
    config::AppConfig,
    notifications::{EmailError, Mailer, OutgoingEmail},
    services::orders::OrderStore,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@farmlink.test";
pub const SENDER_EMAIL: &str = "orders@farmlink.test";

/// Mailer that keeps every message in memory instead of talking SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_with: Mutex<Option<fn() -> EmailError>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("mailer lock").clone()
    }

    /// Makes every following send fail with the given error
    pub fn fail_with(&self, make_error: fn() -> EmailError) {
        *self.fail_with.lock().expect("mailer lock") = Some(make_error);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        if let Some(make_error) = *self.fail_with.lock().expect("mailer lock") {
            return Err(make_error());
        }
        self.sent.lock().expect("mailer lock").push(email);
        Ok(())
    }
}

/// Helper harness driving the full router in-process.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub store: OrderStore,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Application without email credentials; contact delivery disabled.
    pub fn new() -> Self {
        Self::with_config(test_config(), false)
    }

    /// Application with credentials and a recording mailer.
    pub fn with_email(contact_delivery: bool) -> Self {
        let mut cfg = test_config();
        cfg.email_address = Some(SENDER_EMAIL.to_string());
        cfg.email_password = Some("app-password".to_string());
        cfg.admin_email = Some(ADMIN_EMAIL.to_string());
        cfg.contact_email_delivery = contact_delivery;
        Self::with_config(cfg, true)
    }

    fn with_config(cfg: AppConfig, attach_mailer: bool) -> Self {
        let store = OrderStore::new();
        let mailer = Arc::new(RecordingMailer::default());
        let injected = if attach_mailer {
            Some(mailer.clone() as Arc<dyn Mailer>)
        } else {
            None
        };

        let state = AppState::new(cfg, store.clone(), injected);
        let router = farmlink_api::app(state.clone());

        Self {
            router,
            state,
            store,
            mailer,
        }
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Send a raw body with an explicit (or missing) content type.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// Checkout with a valid payload for `method`, returning `(transaction_id, order_id)`.
    pub async fn checkout(&self, method: &str) -> (String, String) {
        let response = self.post("/checkout", checkout_payload(method)).await;
        assert_eq!(response.status(), 200);
        let body = response_json(response).await;
        (
            body["transaction_id"].as_str().expect("transaction_id").to_string(),
            body["order_id"].as_str().expect("order_id").to_string(),
        )
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new("127.0.0.1".to_string(), 18_080, "test".to_string());
    cfg.email_address = None;
    cfg.email_password = None;
    cfg.admin_email = None;
    cfg.contact_email_delivery = false;
    cfg
}

pub fn checkout_payload(method: &str) -> Value {
    serde_json::json!({
        "name": "Ravi Kumar",
        "phone": "9840012345",
        "address": "12 Market Road",
        "city": "Tirunelveli",
        "pincode": "627001",
        "payment_method": method,
        "cart": [{"id": 3, "name": "Bananas", "price": 100, "quantity": 2}],
        "total": 210
    })
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
