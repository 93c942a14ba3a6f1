use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    errors::ServiceError, handlers::common::json_body, models::OrderStatus,
    services::payments::PaymentOutcome, AppState,
};

/// Outcome of a simulated payment.
///
/// A declined payment still answers 200; `success` tells the two apart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
}

impl From<PaymentOutcome> for PaymentResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Approved(order) => Self {
                success: true,
                message: Some("Payment successful".to_string()),
                error: None,
                order_id: Some(order.id),
                transaction_id: Some(order.transaction_id),
                status: order.status,
            },
            PaymentOutcome::Declined(order) => Self {
                success: false,
                message: None,
                error: Some("Payment failed. Please try again.".to_string()),
                order_id: None,
                transaction_id: None,
                status: order.status,
            },
        }
    }
}

/// Take payment for a pending order through the simulated gateway
#[utoipa::path(
    post,
    path = "/process_payment",
    summary = "Process payment",
    description = "Looks up the order by transaction_id and runs the simulated gateway for its payment method. \
                   UPI needs upi_pin; card needs card_number, card_holder, expiry, cvv and otp; cod and netbanking always succeed.",
    responses(
        (status = 200, description = "Payment approved or declined", body = PaymentResponse),
        (status = 400, description = "Missing or malformed payment details, or order not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "payments"
)]
pub async fn process_payment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ServiceError> {
    let payload = json_body(payload)?;
    let outcome = state.services.payments.process_payment(&payload).await?;
    Ok(Json(outcome.into()))
}
