use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{errors::ServiceError, handlers::common::json_body, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    #[schema(example = "TXN48213907")]
    pub transaction_id: String,
    #[schema(example = "FARM1736418600")]
    pub order_id: String,
    #[schema(example = "Checkout initialized successfully")]
    pub message: String,
}

/// Create a pending order from a cart and delivery details
#[utoipa::path(
    post,
    path = "/checkout",
    summary = "Start checkout",
    description = "Validates the customer and cart, recomputes the total with 5% GST and stores a pending order. \
                   Body fields: name, phone, address, city, pincode, payment_method, cart, total.",
    responses(
        (status = 200, description = "Pending order created", body = CheckoutResponse,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Malformed body or missing field", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ServiceError> {
    let payload = json_body(payload)?;
    let receipt = state.services.checkout.checkout(&payload).await?;

    Ok(Json(CheckoutResponse {
        success: true,
        transaction_id: receipt.transaction_id,
        order_id: receipt.order_id,
        message: "Checkout initialized successfully".to_string(),
    }))
}
