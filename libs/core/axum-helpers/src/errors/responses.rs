//! OpenAPI response components for the failure envelope.

use super::FieldError;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::{ToResponse, ToSchema};

/// Schema of [`super::ApiResponse`] when `success` is `false`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorEnvelope {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Route not found")]
    pub message: String,
    /// Only present for validation failures
    pub errors: Option<Vec<FieldError>>,
}

#[derive(ToResponse)]
#[response(
    description = "Bad Request - validation failed",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Validation failed",
        "errors": [
            {"field": "maxTeamSize", "message": "Max team size must be between 1 and 50"},
            {"field": "title", "message": "Title is required"}
        ]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed identifier",
    content_type = "application/json",
    example = json!({"success": false, "message": "Invalid event ID format: abc"})
)]
pub struct BadRequestIdResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({"success": false, "message": "Event not found with id: 42"})
)]
pub struct NotFoundResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({"success": false, "message": "Internal server error"})
)]
pub struct InternalServerErrorResponse(pub ErrorEnvelope);

