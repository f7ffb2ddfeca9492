//! Events API routes

use crate::state::AppState;
use axum::Router;
use domain_events::{EventRepository, MongoEventRepository};
use database::mongodb::Database;
use tracing::info;

/// The domain's router bound to this process's service.
pub fn router<R: EventRepository + 'static>(state: &AppState<R>) -> Router {
    domain_events::events_router().with_state(state.events.clone())
}

/// Ensure the event collection indexes exist.
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
