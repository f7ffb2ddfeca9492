//! Event service layer

use crate::error::{EventError, EventResult};
use crate::models::{
    Event, EventPatch, EventQuery, EventStats, ListQuery, NewEvent, Pagination, StorageHealth,
};
use crate::repository::EventRepository;
use crate::validation::{CreateEvent, UpdateEvent};
use tracing::{info, instrument, warn};

/// Turns raw request payloads into repository calls.
///
/// Payloads are normalized here, so anything reaching the repository is
/// already validated.
pub struct EventService<R: EventRepository> {
    repository: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: ListQuery) -> EventResult<(Vec<Event>, Pagination)> {
        let query = EventQuery::try_from(query)?;
        let (page, limit) = (query.page, query.limit);
        let (events, total) = self.repository.list(query).await?;
        Ok((events, Pagination::new(page, limit, total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let input = NewEvent::try_from(input)?;
        let event = self.repository.create(input).await?;
        info!(event_id = %event.id, backend = self.backend(), "Event created");
        Ok(event)
    }

    #[instrument(skip(self, input))]
    pub async fn replace(&self, id: &str, input: CreateEvent) -> EventResult<Event> {
        let input = NewEvent::try_from(input)?;
        let event = self
            .repository
            .replace(id, input)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        info!(event_id = %event.id, "Event replaced");
        Ok(event)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateEvent) -> EventResult<Event> {
        let patch = EventPatch::try_from(input)?;
        let event = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> EventResult<Event> {
        let event = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        info!(event_id = %event.id, "Event deleted");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> EventResult<u64> {
        let deleted = self.repository.delete_all().await?;
        warn!(deleted_count = deleted, "All events deleted");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> EventResult<EventStats> {
        self.repository.stats().await
    }

    /// Probe the store; never fails, an unreachable store is reported as such.
    pub async fn storage_health(&self) -> StorageHealth {
        let backend = self.backend().to_string();

        let probe = match self.repository.ping().await {
            Ok(()) => self.repository.count().await,
            Err(e) => Err(e),
        };

        match probe {
            Ok(count) => StorageHealth {
                backend,
                connected: true,
                state: "connected".to_string(),
                event_count: Some(count),
            },
            Err(e) => {
                warn!(error = %e, backend = %backend, "Storage health check failed");
                StorageHealth {
                    backend,
                    connected: false,
                    state: "disconnected".to_string(),
                    event_count: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, PrizeMoney, SortField, SortOrder};
    use crate::repository::mock::MockEventRepository;
    use crate::validation::{NumberInput, PrizeMoneyInput};
    use chrono::{Duration, Utc};

    fn stored(id: &str) -> Event {
        let now = Utc::now();
        Event {
            id: id.to_string(),
            title: "Code Sprint".into(),
            description: "Fast coding".into(),
            prize_money: PrizeMoney {
                first: 300.0,
                second: 200.0,
                third: 100.0,
            },
            date_time: now + Duration::days(7),
            venue: "Lab 1".into(),
            event_type: EventType::Technical,
            max_team_size: 4,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_payload() -> CreateEvent {
        CreateEvent {
            title: Some("  code sprint ".into()),
            description: Some("Fast coding".into()),
            prize_money: Some(PrizeMoneyInput {
                first: Some(NumberInput::Number(300.0)),
                second: Some(NumberInput::Text("200".into())),
                third: Some(NumberInput::Number(100.0)),
            }),
            date_time: Some((Utc::now() + Duration::days(7)).to_rfc3339()),
            venue: Some("Lab 1".into()),
            event_type: Some("Technical".into()),
            max_team_size: Some(NumberInput::Number(4.0)),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_before_storing() {
        let mut repo = MockEventRepository::new();
        repo.expect_create()
            .withf(|input: &NewEvent| {
                input.title == "Code Sprint" && input.prize_money.second == 200.0
            })
            .times(1)
            .returning(|_| Ok(stored("1")));
        repo.expect_backend().return_const("memory");

        let service = EventService::new(repo);
        let event = service.create(create_payload()).await.unwrap();
        assert_eq!(event.id, "1");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload_without_touching_store() {
        let mut repo = MockEventRepository::new();
        repo.expect_create().never();

        let service = EventService::new(repo);
        let mut payload = create_payload();
        payload.title = None;

        match service.create(payload).await {
            Err(EventError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "title");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id()
            .withf(|id| id == "42")
            .returning(|_| Ok(None));

        let service = EventService::new(repo);
        let err = service.get("42").await.unwrap_err();
        assert!(matches!(err, EventError::NotFound(id) if id == "42"));
    }

    #[tokio::test]
    async fn test_invalid_id_passes_through() {
        let mut repo = MockEventRepository::new();
        repo.expect_delete()
            .returning(|id| Err(EventError::InvalidId(id.to_string())));

        let service = EventService::new(repo);
        assert!(matches!(
            service.delete("abc").await,
            Err(EventError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_list_builds_pagination() {
        let mut repo = MockEventRepository::new();
        repo.expect_list()
            .withf(|q: &EventQuery| {
                q.page == 2 && q.limit == 2 && q.sort_by == SortField::Title && q.order == SortOrder::Desc
            })
            .returning(|_| Ok((vec![stored("3"), stored("4")], 5)));

        let service = EventService::new(repo);
        let (events, pagination) = service
            .list(ListQuery {
                page: Some("2".into()),
                limit: Some("2".into()),
                sort_by: Some("title".into()),
                order: Some("desc".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_next_page);
        assert!(pagination.has_prev_page);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_field() {
        let mut repo = MockEventRepository::new();
        repo.expect_list().never();

        let service = EventService::new(repo);
        let err = service
            .list(ListQuery {
                sort_by: Some("popularity".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Validation(e) if e[0].field == "sortBy"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut repo = MockEventRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = EventService::new(repo);
        let err = service
            .update(
                "7",
                UpdateEvent {
                    venue: Some("Hall B".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_storage_health_connected() {
        let mut repo = MockEventRepository::new();
        repo.expect_backend().return_const("mongodb");
        repo.expect_ping().returning(|| Ok(()));
        repo.expect_count().returning(|| Ok(12));

        let health = EventService::new(repo).storage_health().await;
        assert!(health.connected);
        assert_eq!(health.state, "connected");
        assert_eq!(health.event_count, Some(12));
    }

    #[tokio::test]
    async fn test_storage_health_disconnected() {
        let mut repo = MockEventRepository::new();
        repo.expect_backend().return_const("mongodb");
        repo.expect_ping()
            .returning(|| Err(EventError::Database("server selection timeout".into())));
        repo.expect_count().never();

        let health = EventService::new(repo).storage_health().await;
        assert!(!health.connected);
        assert_eq!(health.state, "disconnected");
        assert_eq!(health.event_count, None);
    }
}
