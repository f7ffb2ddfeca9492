//! Events API server
//!
//! Library half of the `events_api` binary, so the assembled router can be
//! exercised in tests without binding a socket.

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use axum_helpers::errors::handlers::not_found;
use domain_events::EventRepository;

use state::AppState;

/// Full application router: `/api/*`, documentation UIs and `/health`.
pub async fn build_router<R: EventRepository + 'static>(
    state: &AppState<R>,
) -> std::io::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(api::routes(state)).await?;

    Ok(router
        .merge(health_router(state.config.app))
        .method_not_allowed_fallback(not_found))
}
