//! API routes, nested under `/api` by `axum_helpers::create_router`.

pub mod events;
pub mod health;

use axum::Router;
use domain_events::EventRepository;

use crate::state::AppState;

pub fn routes<R: EventRepository + 'static>(state: &AppState<R>) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .merge(health::router(state.clone()))
}
