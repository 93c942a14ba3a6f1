//! FarmLink marketplace backend
//!
//! HTTP API for the FarmLink direct farmer-to-buyer marketplace: contact form,
//! checkout, simulated payments and invoice lookups over an in-memory order
//! store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod common;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod notifications;
pub mod openapi;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    config::AppConfig,
    handlers::AppServices,
    notifications::{Mailer, SmtpMailer},
    services::{contact::ContactNotifier, orders::OrderStore},
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: AppServices,
}

impl AppState {
    /// Builds the state around `mailer`, or an SMTP mailer from `config`
    /// when none is given. Email stays unconfigured without credentials.
    pub fn new(config: AppConfig, store: OrderStore, mailer: Option<Arc<dyn Mailer>>) -> Self {
        let mailer = mailer.or_else(|| {
            config
                .email_settings()
                .map(|settings| Arc::new(SmtpMailer::new(settings)) as Arc<dyn Mailer>)
        });
        let contact = ContactNotifier::from_config(&config, mailer);

        Self {
            config: Arc::new(config),
            services: AppServices::new(store, contact),
        }
    }
}

/// Every route the service exposes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/send-message", post(handlers::contact::send_message))
        .route("/checkout", post(handlers::checkout::checkout))
        .route("/process_payment", post(handlers::payments::process_payment))
        .route(
            "/order_status/:transaction_id",
            get(handlers::orders::order_status),
        )
        .route("/api/orders", post(handlers::orders::create_order))
        .route("/api/invoice/:order_id", get(handlers::invoices::get_invoice))
        .route(
            "/api/invoice/pdf/:order_id",
            get(handlers::invoices::get_invoice_pdf),
        )
        .route("/test-email", get(handlers::email::test_email))
        .route("/health", get(handlers::health::health))
        .route(openapi::OPENAPI_JSON_PATH, get(openapi::openapi_json))
}

/// CORS policy for the configured browser origins
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(crate::tracing::REQUEST_ID_HEADER)])
        .allow_credentials(config.cors_allow_credentials)
}

/// The complete application: routes, HTTP tracing, CORS and request ids
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    routes()
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
