//! Event domain error types

use axum_helpers::{AppError, FieldError, flatten_validation_errors};
use thiserror::Error;

pub type EventResult<T> = std::result::Result<T, EventError>;

/// Closed set of failures surfaced by the service and repositories.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// The id is not syntactically valid for the active backend
    #[error("Invalid event ID format: {0}")]
    InvalidId(String),

    #[error("Event not found with id: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(flatten_validation_errors(&err))
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for EventError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Database(format!("BSON deserialization error: {err}"))
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Database(format!("BSON serialization error: {err}"))
    }
}

impl From<mongodb::bson::document::ValueAccessError> for EventError {
    fn from(err: mongodb::bson::document::ValueAccessError) -> Self {
        Self::Database(format!("Unexpected aggregation result: {err}"))
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(errors) => AppError::Validation(errors),
            err @ EventError::InvalidId(_) => AppError::BadRequest(err.to_string()),
            err @ EventError::NotFound(_) => AppError::NotFound(err.to_string()),
            EventError::Database(message) => AppError::Database(message),
            EventError::Internal(message) => AppError::InternalServerError(message),
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}
