//! Shared application state passed to the API routers.

use domain_events::{EventRepository, EventService};
use std::sync::Arc;
use std::time::Instant;

/// Configuration plus the event service for the selected backend.
///
/// Cloning is cheap: the service sits behind an `Arc`.
pub struct AppState<R: EventRepository> {
    pub config: crate::config::Config,
    pub events: Arc<EventService<R>>,
    /// Process start, for `uptimeSeconds` in the health report
    pub started_at: Instant,
}

impl<R: EventRepository> AppState<R> {
    pub fn new(config: crate::config::Config, repository: R) -> Self {
        Self {
            config,
            events: Arc::new(EventService::new(repository)),
            started_at: Instant::now(),
        }
    }
}

impl<R: EventRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            events: Arc::clone(&self.events),
            started_at: self.started_at,
        }
    }
}
