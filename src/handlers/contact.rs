use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::{
    errors::ServiceError,
    handlers::common::{json_body, MessageResponse},
    AppState,
};

pub const CONTACT_ACCEPTED: &str =
    "Your message has been sent successfully! We will get back to you soon.";

/// Contact-form submission
#[utoipa::path(
    post,
    path = "/send-message",
    summary = "Send contact message",
    description = "Body fields: name, email, message (required) and subject (optional). \
                   When email delivery is enabled the admin is notified and the sender gets a confirmation.",
    responses(
        (status = 200, description = "Message accepted", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid email", body = crate::errors::ErrorResponse),
        (status = 500, description = "Email delivery failed", body = crate::errors::ErrorResponse),
    ),
    tag = "contact"
)]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let payload = json_body(payload)?;
    state.services.contact.submit(&payload).await?;
    Ok(Json(MessageResponse::ok(CONTACT_ACCEPTED)))
}
