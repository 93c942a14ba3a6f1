use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Liveness plus configuration visibility
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "FarmLink Backend")]
    pub service: String,
    pub version: String,
    pub email_configured: bool,
    /// Orders created since start-up
    pub orders_count: usize,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "FarmLink Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        email_configured: state.config.email_configured(),
        orders_count: state.services.orders.count().await,
        timestamp: Utc::now().to_rfc3339(),
    })
}
