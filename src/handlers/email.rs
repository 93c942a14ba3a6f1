use axum::{extract::State, Json};
use tracing::warn;

use crate::{
    errors::ServiceError, handlers::common::MessageResponse, notifications::EmailError, AppState,
};

const NOT_CONFIGURED: &str =
    "Email credentials not configured. Please set EMAIL_ADDRESS and EMAIL_PASSWORD in .env file";

/// SMTP smoke test
#[utoipa::path(
    get,
    path = "/test-email",
    summary = "Send a test email",
    description = "Sends a plain-text message to the admin address. Reports success: false without sending \
                   when no credentials are configured.",
    responses(
        (status = 200, description = "Sent, or credentials missing", body = MessageResponse),
        (status = 500, description = "SMTP failure", body = crate::errors::ErrorResponse),
    ),
    tag = "system"
)]
pub async fn test_email(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ServiceError> {
    match state.services.contact.send_test_email().await {
        Ok(()) => Ok(Json(MessageResponse::ok("Test email sent successfully!"))),
        Err(EmailError::NotConfigured) => {
            warn!("Test email requested without SMTP credentials");
            Ok(Json(MessageResponse::failed(NOT_CONFIGURED)))
        }
        Err(err) => Err(err.into()),
    }
}
