use axum::Json;
use utoipa::OpenApi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FarmLink API",
        version = "0.1.0",
        description = r#"
# FarmLink marketplace backend

Direct farmer-to-buyer marketplace: contact form, checkout, simulated payments
and invoice lookups.

## Orders

Checkout stores a `pending` order and returns a `transaction_id`. Paying moves
it to `paid` or `payment_failed`; both are final. Orders created through
`/api/orders` start out `completed`. Totals always include 5% GST and are
recomputed on the server.

Orders live in memory only and are lost on restart.

## Error Handling

Failing requests answer with:

```json
{
  "success": false,
  "error": "Order not found",
  "request_id": "5f1c...",
  "timestamp": "2025-01-09T10:30:00+00:00"
}
```

A declined payment is not an error: it answers 200 with `success: false`.
Always check `success`.
"#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Checkout, direct creation and status lookups"),
        (name = "payments", description = "Simulated payment gateway"),
        (name = "invoices", description = "Invoice data"),
        (name = "contact", description = "Contact form"),
        (name = "system", description = "Health and SMTP smoke test")
    ),
    paths(
        crate::handlers::checkout::checkout,
        crate::handlers::payments::process_payment,
        crate::handlers::orders::order_status,
        crate::handlers::orders::create_order,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::get_invoice_pdf,
        crate::handlers::contact::send_message,
        crate::handlers::email::test_email,
        crate::handlers::health::health,
    ),
    components(
        schemas(
            crate::models::Order,
            crate::models::Customer,
            crate::models::OrderStatus,
            crate::handlers::checkout::CheckoutResponse,
            crate::handlers::payments::PaymentResponse,
            crate::handlers::orders::OrderEnvelope,
            crate::handlers::orders::OrderCreatedResponse,
            crate::handlers::invoices::InvoicePdfResponse,
            crate::handlers::common::MessageResponse,
            crate::handlers::health::HealthResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

/// Serves the generated document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
