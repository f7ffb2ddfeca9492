//! Readiness report for the API and its storage backend

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use axum_helpers::{ApiResponse, ErrorCode};
use chrono::{DateTime, Utc};
use domain_events::{EventRepository, StorageHealth};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "events_api")]
    pub service: String,
    pub version: String,
    #[schema(example = "development")]
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub storage: StorageHealth,
}

pub fn router<R: EventRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(api_health::<R>))
        .with_state(state)
}

/// Server and storage status
///
/// Answers 503 when the storage backend cannot be reached.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server and storage are up", body = ApiHealth),
        (status = 503, description = "Storage backend unavailable", body = ApiHealth)
    ),
    tag = "health"
)]
pub async fn api_health<R: EventRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let storage = state.events.storage_health().await;
    let connected = storage.connected;

    let report = ApiHealth {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        service: state.config.app.name.to_string(),
        version: state.config.app.version.to_string(),
        environment: state.config.environment.as_str().to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        storage,
    };

    if connected {
        ApiResponse::ok("Server is running", report).with_status(StatusCode::OK)
    } else {
        tracing::warn!(
            error_code = ErrorCode::ServiceUnavailable.code(),
            backend = %report.storage.backend,
            "Storage backend unavailable"
        );
        let mut response = ApiResponse::ok("Storage backend unavailable", report);
        response.success = false;
        response.with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
