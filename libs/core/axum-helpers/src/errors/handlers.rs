use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::ApiResponse;

/// Router fallback: unknown path, or a known path with an unsupported method.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::info!(%method, %uri, "Route not found");
    ApiResponse::failure("Route not found")
        .with_status(StatusCode::NOT_FOUND)
        .into_response()
}
