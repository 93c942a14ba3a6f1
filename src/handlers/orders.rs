use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{errors::ServiceError, handlers::common::json_body, models::Order, AppState};

/// `{success, order}` envelope shared by status and invoice lookups
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCreatedResponse {
    pub success: bool,
    #[schema(example = "Order created successfully")]
    pub message: String,
    pub order: Order,
    #[schema(example = "/api/invoice/FARM1736418600")]
    pub invoice_url: String,
}

/// Look up an order by its transaction id
#[utoipa::path(
    get,
    path = "/order_status/{transaction_id}",
    summary = "Get order status",
    params(("transaction_id" = String, Path, description = "Transaction id returned by checkout")),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn order_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<OrderEnvelope>, ServiceError> {
    let order = state
        .services
        .orders
        .get_by_transaction_id(&transaction_id)
        .await?;
    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}

/// Create an already completed order directly
#[utoipa::path(
    post,
    path = "/api/orders",
    summary = "Create order",
    description = "All fields are optional: customer, payment_method (default upi), cart (default empty) and transaction_id. \
                   The total is recomputed from the cart.",
    responses(
        (status = 200, description = "Order created", body = OrderCreatedResponse),
        (status = 400, description = "Malformed body", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OrderCreatedResponse>, ServiceError> {
    let payload = json_body(payload)?;
    let order = state.services.orders.create_order(&payload).await?;

    Ok(Json(OrderCreatedResponse {
        success: true,
        message: "Order created successfully".to_string(),
        invoice_url: order.invoice_url(),
        order,
    }))
}
