pub mod codes;
pub mod handlers;
pub mod response;
pub mod responses;
pub mod validation;

pub use codes::ErrorCode;
pub use response::ApiResponse;
pub use validation::{FieldError, flatten_validation_errors};

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_config::Environment;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error type rendered as an [`ApiResponse`] failure envelope.
///
/// 4xx variants are logged at info/warn, 5xx at error, each with an
/// `error_code` field from [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Invalid JSON body: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Invalid query parameters: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Invalid path parameter: {0}")]
    PathExtractorRejection(#[from] PathRejection),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(flatten_validation_errors(&errors))
    }
}

/// Hide server-side details unless running in development.
fn server_message(code: ErrorCode, detail: String) -> String {
    if Environment::from_env().is_production() {
        code.default_message().to_string()
    } else {
        detail
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                (
                    StatusCode::BAD_REQUEST,
                    ApiResponse::failure(format!("Invalid JSON body: {}", e.body_text())),
                )
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Query extraction error: {}",
                    e.body_text()
                );
                (
                    e.status(),
                    ApiResponse::failure(format!("Invalid query parameters: {}", e.body_text())),
                )
            }
            AppError::PathExtractorRejection(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!(
                        error_code = ErrorCode::InternalError.code(),
                        "Path extraction error: {}",
                        e.body_text()
                    );
                } else {
                    tracing::info!(
                        error_code = ErrorCode::BadRequest.code(),
                        "Path extraction error: {}",
                        e.body_text()
                    );
                }
                (
                    status,
                    ApiResponse::failure(format!("Invalid path parameter: {}", e.body_text())),
                )
            }
            AppError::Validation(errors) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    violations = errors.len(),
                    "Validation failed"
                );
                (
                    StatusCode::BAD_REQUEST,
                    ApiResponse::failure(ErrorCode::ValidationError.default_message())
                        .with_errors(errors),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ApiResponse::failure(msg))
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ApiResponse::failure(msg))
            }
            AppError::Database(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(server_message(
                        ErrorCode::DatabaseError,
                        format!("Database error: {msg}"),
                    )),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(server_message(ErrorCode::InternalError, msg)),
                )
            }
        };

        body.with_status(status).into_response()
    }
}
