use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{errors::ServiceError, handlers::orders::OrderEnvelope, models::Order, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoicePdfResponse {
    pub success: bool,
    #[schema(example = "PDF generation would happen here")]
    pub message: String,
    pub order: Order,
}

/// Invoice data for an order
#[utoipa::path(
    get,
    path = "/api/invoice/{order_id}",
    summary = "Get invoice",
    params(("order_id" = String, Path, description = "Order id, e.g. FARM1736418600")),
    responses(
        (status = 200, description = "Invoice data", body = OrderEnvelope),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderEnvelope>, ServiceError> {
    let order = state.services.orders.get_by_id(&order_id).await?;
    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}

/// Placeholder for a rendered invoice; returns the order as JSON
#[utoipa::path(
    get,
    path = "/api/invoice/pdf/{order_id}",
    summary = "Get invoice PDF",
    params(("order_id" = String, Path, description = "Order id, e.g. FARM1736418600")),
    responses(
        (status = 200, description = "Invoice data", body = InvoicePdfResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "invoices"
)]
pub async fn get_invoice_pdf(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<InvoicePdfResponse>, ServiceError> {
    let order = state.services.orders.get_by_id(&order_id).await?;
    Ok(Json(InvoicePdfResponse {
        success: true,
        message: "PDF generation would happen here".to_string(),
        order,
    }))
}
