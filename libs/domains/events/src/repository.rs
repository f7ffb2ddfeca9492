//! Event repository trait

use crate::error::EventResult;
use crate::models::{Event, EventPatch, EventQuery, EventStats, NewEvent};
use async_trait::async_trait;

/// Storage contract shared by the MongoDB and in-memory backends.
///
/// Ids are opaque strings; a backend answers
/// [`EventError::InvalidId`](crate::EventError::InvalidId) for ids it could
/// never have issued.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// One page of events plus the total number matching the filter
    async fn list(&self, query: EventQuery) -> EventResult<(Vec<Event>, u64)>;

    async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>>;

    /// Assign id and timestamps, then persist
    async fn create(&self, input: NewEvent) -> EventResult<Event>;

    /// Overwrite all fields except `id`/`createdAt`; `None` when absent
    async fn replace(&self, id: &str, input: NewEvent) -> EventResult<Option<Event>>;

    /// Merge the patch into the stored record; `None` when absent
    async fn update(&self, id: &str, patch: EventPatch) -> EventResult<Option<Event>>;

    /// Remove and return the record; `None` when absent
    async fn delete(&self, id: &str) -> EventResult<Option<Event>>;

    /// Remove everything, returning how many records went
    async fn delete_all(&self) -> EventResult<u64>;

    async fn count(&self) -> EventResult<u64>;

    async fn stats(&self) -> EventResult<EventStats>;

    /// Connectivity check against the underlying store
    async fn ping(&self) -> EventResult<()>;

    /// `"mongodb"` or `"memory"`
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub EventRepository {}

        #[async_trait]
        impl EventRepository for EventRepository {
            async fn list(&self, query: EventQuery) -> EventResult<(Vec<Event>, u64)>;
            async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>>;
            async fn create(&self, input: NewEvent) -> EventResult<Event>;
            async fn replace(&self, id: &str, input: NewEvent) -> EventResult<Option<Event>>;
            async fn update(&self, id: &str, patch: EventPatch) -> EventResult<Option<Event>>;
            async fn delete(&self, id: &str) -> EventResult<Option<Event>>;
            async fn delete_all(&self) -> EventResult<u64>;
            async fn count(&self) -> EventResult<u64>;
            async fn stats(&self) -> EventResult<EventStats>;
            async fn ping(&self) -> EventResult<()>;
            fn backend(&self) -> &'static str;
        }
    }
}
