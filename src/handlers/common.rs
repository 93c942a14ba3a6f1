use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Unwraps an extracted JSON body, mapping extractor rejections to `BadRequest`.
///
/// Shape checks (object, required fields) are left to the services.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ServiceError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(ServiceError::BadRequest(
            "Content-Type must be application/json".to_string(),
        )),
        Err(rejection) => Err(ServiceError::BadRequest(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    }
}

/// `{success, message}` or `{success, error}` acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
