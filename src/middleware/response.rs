use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that adds `"success": true` to the body.
///
/// `T` must serialize to a JSON object; its fields sit next to the flag,
/// e.g. `{ "success": true, "count": 3, "data": [...] }`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with a 200 status
    pub fn success(body: T) -> Self {
        Self { body }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut envelope = match serde_json::to_value(&self.body) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                tracing::error!("Response body is not a JSON object: {}", other);
                return serialization_failure();
            }
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return serialization_failure();
            }
        };

        envelope.insert("success".to_string(), Value::Bool(true));
        (StatusCode::OK, Json(Value::Object(envelope))).into_response()
    }
}

fn serialization_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Failed to serialize response data"
        })),
    )
        .into_response()
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
