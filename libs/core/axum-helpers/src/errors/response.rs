//! The JSON envelope every endpoint answers with.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::FieldError;

/// `{success, message, data?, errors?, pagination?}`; absent parts are omitted.
///
/// ```json
/// { "success": true, "message": "Event retrieved successfully", "data": { "id": "1" } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = (), P = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<P>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            pagination: None,
        }
    }
}

impl ApiResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
            pagination: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl<T, P> ApiResponse<T, P> {
    pub fn with_pagination<Q>(self, pagination: Q) -> ApiResponse<T, Q> {
        ApiResponse {
            success: self.success,
            message: self.message,
            data: self.data,
            errors: self.errors,
            pagination: Some(pagination),
        }
    }

    /// Pair the envelope with a status code other than 200.
    pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

impl<T: Serialize, P: Serialize> IntoResponse for ApiResponse<T, P> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
