//! In-process event store. Contents are lost on restart.

use crate::error::{EventError, EventResult};
use crate::models::{
    Event, EventPatch, EventQuery, EventStats, NewEvent, SortField, SortOrder,
};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

#[derive(Debug, Default)]
struct Store {
    events: BTreeMap<u64, Event>,
    /// Last id handed out; ids are never reused, even after `delete_all`
    last_id: u64,
}

/// `RwLock`-guarded map keyed by sequential numeric ids starting at `1`.
///
/// Every mutation holds the write lock for its whole read-modify-write.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> EventResult<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EventError::InvalidId(id.to_string()));
    }
    match id.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EventError::InvalidId(id.to_string())),
    }
}

fn compare(a: &(u64, &Event), b: &(u64, &Event), field: SortField) -> Ordering {
    let (ea, eb) = (a.1, b.1);
    let primary = match field {
        SortField::Id => Ordering::Equal,
        SortField::Title => ea.title.cmp(&eb.title),
        SortField::Description => ea.description.cmp(&eb.description),
        SortField::PrizeFirst => ea.prize_money.first.total_cmp(&eb.prize_money.first),
        SortField::PrizeSecond => ea.prize_money.second.total_cmp(&eb.prize_money.second),
        SortField::PrizeThird => ea.prize_money.third.total_cmp(&eb.prize_money.third),
        SortField::DateTime => ea.date_time.cmp(&eb.date_time),
        SortField::Venue => ea.venue.cmp(&eb.venue),
        SortField::EventType => ea.event_type.to_string().cmp(&eb.event_type.to_string()),
        SortField::MaxTeamSize => ea.max_team_size.cmp(&eb.max_team_size),
        SortField::CreatedAt => ea.created_at.cmp(&eb.created_at),
        SortField::UpdatedAt => ea.updated_at.cmp(&eb.updated_at),
    };
    primary.then(a.0.cmp(&b.0))
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: EventQuery) -> EventResult<(Vec<Event>, u64)> {
        let store = self.store.read().await;

        let mut matching: Vec<(u64, &Event)> = store
            .events
            .iter()
            .filter(|(_, e)| query.event_type.is_none_or(|t| e.event_type == t))
            .map(|(id, e)| (*id, e))
            .collect();

        matching.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(query.skip()).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .map(|(_, e)| e.clone())
            .collect();

        Ok((page, total))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>> {
        let key = parse_id(id)?;
        Ok(self.store.read().await.events.get(&key).cloned())
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewEvent) -> EventResult<Event> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let id = store.last_id;

        let event = Event::new(id.to_string(), input, Utc::now());
        store.events.insert(id, event.clone());
        Ok(event)
    }

    #[instrument(skip(self, input))]
    async fn replace(&self, id: &str, input: NewEvent) -> EventResult<Option<Event>> {
        let key = parse_id(id)?;
        let mut store = self.store.write().await;
        Ok(store.events.get_mut(&key).map(|event| {
            event.replace_with(input, Utc::now());
            event.clone()
        }))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: EventPatch) -> EventResult<Option<Event>> {
        let key = parse_id(id)?;
        let mut store = self.store.write().await;
        Ok(store.events.get_mut(&key).map(|event| {
            event.apply_patch(patch, Utc::now());
            event.clone()
        }))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> EventResult<Option<Event>> {
        let key = parse_id(id)?;
        Ok(self.store.write().await.events.remove(&key))
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> EventResult<u64> {
        let mut store = self.store.write().await;
        let removed = store.events.len() as u64;
        store.events.clear();
        Ok(removed)
    }

    async fn count(&self) -> EventResult<u64> {
        Ok(self.store.read().await.events.len() as u64)
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> EventResult<EventStats> {
        let store = self.store.read().await;
        Ok(EventStats::from_events(store.events.values()))
    }

    async fn ping(&self) -> EventResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, PrizeMoney, PrizeMoneyPatch};
    use chrono::Duration;

    fn new_event(title: &str, event_type: EventType, days: i64, first: f64) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "Description".into(),
            prize_money: PrizeMoney {
                first,
                second: 10.0,
                third: 5.0,
            },
            date_time: Utc::now() + Duration::days(days),
            venue: "Hall".into(),
            event_type,
            max_team_size: 3,
        }
    }

    async fn seeded() -> InMemoryEventRepository {
        let repo = InMemoryEventRepository::new();
        for (i, t) in ["E", "B", "D", "A", "C"].into_iter().enumerate() {
            let kind = if i % 2 == 0 { EventType::Technical } else { EventType::Art };
            repo.create(new_event(t, kind, 10 - i as i64, i as f64 * 100.0))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_never_reused() {
        let repo = InMemoryEventRepository::new();
        let a = repo.create(new_event("A", EventType::Music, 1, 0.0)).await.unwrap();
        let b = repo.create(new_event("B", EventType::Music, 1, 0.0)).await.unwrap();
        assert_eq!((a.id.as_str(), b.id.as_str()), ("1", "2"));

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        let c = repo.create(new_event("C", EventType::Music, 1, 0.0)).await.unwrap();
        assert_eq!(c.id, "3");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_ids_are_distinguished_from_missing() {
        let repo = InMemoryEventRepository::new();
        for bad in ["abc", "0", "-1", "+1", "1.5", ""] {
            assert!(
                matches!(repo.get_by_id(bad).await, Err(EventError::InvalidId(_))),
                "{bad:?} should be invalid"
            );
        }
        assert!(repo.get_by_id("99").await.unwrap().is_none());
        assert!(repo.delete("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorts_paginates_and_filters() {
        let repo = seeded().await;

        let query = EventQuery {
            page: 2,
            limit: 2,
            sort_by: SortField::Title,
            ..Default::default()
        };
        let (page, total) = repo.list(query).await.unwrap();
        assert_eq!(total, 5);
        let titles: Vec<_> = page.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["C", "D"]);

        let (desc, _) = repo
            .list(EventQuery {
                sort_by: SortField::PrizeFirst,
                order: SortOrder::Desc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(desc[0].prize_money.first, 400.0);

        let (arts, total) = repo
            .list(EventQuery {
                event_type: Some(EventType::Art),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(arts.iter().all(|e| e.event_type == EventType::Art));
        // Default sort is dateTime ascending.
        assert!(arts[0].date_time <= arts[1].date_time);
    }

    #[tokio::test]
    async fn test_ties_break_on_id() {
        let repo = seeded().await;
        let (events, _) = repo
            .list(EventQuery {
                sort_by: SortField::Venue,
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_update_merges_and_bumps_updated_at() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(new_event("Quiz", EventType::Academic, 3, 100.0)).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                EventPatch {
                    prize_money: Some(PrizeMoneyPatch {
                        second: Some(42.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.prize_money.first, 100.0);
        assert_eq!(updated.prize_money.second, 42.0);
        assert_eq!(updated.prize_money.third, 5.0);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(new_event("Old", EventType::Sports, 3, 1.0)).await.unwrap();

        let replaced = repo
            .replace(&created.id, new_event("New", EventType::Dance, 5, 2.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.title, "New");
        assert_eq!(replaced.event_type, EventType::Dance);

        let deleted = repo.delete(&created.id).await.unwrap().unwrap();
        assert_eq!(deleted.title, "New");
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(
            repo.replace(&created.id, new_event("X", EventType::Art, 1, 0.0))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = seeded().await;
        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_events, 5);
        assert_eq!(stats.by_type[0].event_type, EventType::Technical);
        assert_eq!(stats.by_type[0].count, 3);
        // 0+100+...+400 first prizes plus 15 per event
        assert_eq!(stats.total_prize_money, 1000.0 + 75.0);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let repo = InMemoryEventRepository::new();
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_event(&format!("E{i}"), EventType::Cultural, 2, 0.0))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(repo.count().await.unwrap(), 20);
    }
}
