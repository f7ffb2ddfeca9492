//! MongoDB implementation of EventRepository

use crate::error::{EventError, EventResult};
use crate::models::{
    Event, EventPatch, EventQuery, EventStats, EventType, EventTypeStats, NewEvent, PrizeMoney,
    SortField, SortOrder,
};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const EVENTS_COLLECTION: &str = "events";

/// Stored shape: ObjectId key, BSON dates, camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    description: String,
    prize_money: PrizeMoney,
    date_time: bson::DateTime,
    venue: String,
    event_type: EventType,
    max_team_size: i32,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl EventDocument {
    fn from_event(event: &Event) -> EventResult<Self> {
        Ok(Self {
            id: Some(parse_object_id(&event.id)?),
            title: event.title.clone(),
            description: event.description.clone(),
            prize_money: event.prize_money,
            date_time: to_bson_datetime(event.date_time),
            venue: event.venue.clone(),
            event_type: event.event_type,
            max_team_size: i32::try_from(event.max_team_size)
                .map_err(|e| EventError::Internal(e.to_string()))?,
            created_at: to_bson_datetime(event.created_at),
            updated_at: to_bson_datetime(event.updated_at),
        })
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            title: doc.title,
            description: doc.description,
            prize_money: doc.prize_money,
            date_time: from_bson_datetime(doc.date_time),
            venue: doc.venue,
            event_type: doc.event_type,
            max_team_size: u32::try_from(doc.max_team_size).unwrap_or_default(),
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

fn parse_object_id(id: &str) -> EventResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| EventError::InvalidId(id.to_string()))
}

/// Numeric aggregation output may come back as any BSON number type.
fn bson_number(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Double(n)) => *n,
        Some(Bson::Int32(n)) => *n as f64,
        Some(Bson::Int64(n)) => *n as f64,
        _ => 0.0,
    }
}

/// MongoDB-backed event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    db: Database,
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, EVENTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection(collection_name),
        }
    }

    /// Indexes backing the default sort and the type filter.
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "dateTime": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "eventType": 1, "dateTime": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        debug!("Event indexes ensured");
        Ok(())
    }

    fn build_filter(query: &EventQuery) -> Document {
        let mut filter = Document::new();
        if let Some(event_type) = query.event_type {
            filter.insert("eventType", event_type.to_string());
        }
        filter
    }

    fn build_sort(query: &EventQuery) -> Document {
        let direction = match query.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        match query.sort_by {
            SortField::Id => doc! { "_id": direction },
            field => doc! { field.as_str(): direction, "_id": direction },
        }
    }

    fn stats_pipeline() -> Vec<Document> {
        vec![doc! {
            "$group": {
                "_id": "$eventType",
                "count": { "$sum": 1 },
                "totalPrizeMoney": {
                    "$sum": {
                        "$add": ["$prizeMoney.first", "$prizeMoney.second", "$prizeMoney.third"]
                    }
                }
            }
        }]
    }

    async fn find_document(&self, oid: ObjectId) -> EventResult<Option<EventDocument>> {
        Ok(self.collection.find_one(doc! { "_id": oid }).await?)
    }

    /// Write back a modified record; `None` if it vanished in between.
    async fn write_back(&self, oid: ObjectId, event: Event) -> EventResult<Option<Event>> {
        let document = EventDocument::from_event(&event)?;
        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, document)
            .await?;
        Ok((result.matched_count > 0).then_some(event))
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: EventQuery) -> EventResult<(Vec<Event>, u64)> {
        let filter = Self::build_filter(&query);
        let total = self.collection.count_documents(filter.clone()).await?;

        let limit = i64::try_from(query.limit).map_err(|e| EventError::Internal(e.to_string()))?;
        let documents: Vec<EventDocument> = self
            .collection
            .find(filter)
            .sort(Self::build_sort(&query))
            .skip(query.skip())
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((documents.into_iter().map(Event::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>> {
        let oid = parse_object_id(id)?;
        Ok(self.find_document(oid).await?.map(Event::from))
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewEvent) -> EventResult<Event> {
        let oid = ObjectId::new();
        let event = Event::new(oid.to_hex(), input, Utc::now());

        self.collection
            .insert_one(EventDocument::from_event(&event)?)
            .await?;
        Ok(event)
    }

    #[instrument(skip(self, input))]
    async fn replace(&self, id: &str, input: NewEvent) -> EventResult<Option<Event>> {
        let oid = parse_object_id(id)?;
        let Some(document) = self.find_document(oid).await? else {
            return Ok(None);
        };

        let mut event = Event::from(document);
        event.replace_with(input, Utc::now());
        self.write_back(oid, event).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: EventPatch) -> EventResult<Option<Event>> {
        let oid = parse_object_id(id)?;
        let Some(document) = self.find_document(oid).await? else {
            return Ok(None);
        };

        let mut event = Event::from(document);
        event.apply_patch(patch, Utc::now());
        self.write_back(oid, event).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> EventResult<Option<Event>> {
        let oid = parse_object_id(id)?;
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?;
        Ok(removed.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> EventResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn count(&self) -> EventResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> EventResult<EventStats> {
        let groups: Vec<Document> = self
            .collection
            .aggregate(Self::stats_pipeline())
            .await?
            .try_collect()
            .await?;

        let buckets = groups
            .iter()
            .map(|group| {
                let name = group.get_str("_id")?;
                let event_type = name.parse::<EventType>().map_err(|_| {
                    EventError::Database(format!("Unknown event type in store: {name}"))
                })?;
                Ok(EventTypeStats {
                    event_type,
                    count: bson_number(group.get("count")) as u64,
                    total_prize_money: bson_number(group.get("totalPrizeMoney")),
                })
            })
            .collect::<EventResult<Vec<_>>>()?;

        Ok(EventStats::from_buckets(buckets))
    }

    async fn ping(&self) -> EventResult<()> {
        let status = database::mongodb::check_health_detailed(&self.db).await;
        if status.healthy {
            debug!(response_time_ms = status.response_time_ms, "MongoDB ping ok");
            Ok(())
        } else {
            Err(EventError::Database(
                status.message.unwrap_or_else(|| "ping failed".to_string()),
            ))
        }
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: "Hackathon".into(),
            description: "24 hours".into(),
            prize_money: PrizeMoney {
                first: 1000.0,
                second: 500.0,
                third: 250.0,
            },
            date_time: Utc.with_ymd_and_hms(2031, 1, 2, 3, 4, 5).unwrap(),
            venue: "Lab".into(),
            event_type: EventType::Technical,
            max_team_size: 5,
            created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            updated_at: Utc.timestamp_millis_opt(1_700_000_000_456).unwrap(),
        }
    }

    #[test]
    fn test_build_filter() {
        assert!(MongoEventRepository::build_filter(&EventQuery::default()).is_empty());

        let filter = MongoEventRepository::build_filter(&EventQuery {
            event_type: Some(EventType::Sports),
            ..Default::default()
        });
        assert_eq!(filter, doc! { "eventType": "Sports" });
    }

    #[test]
    fn test_build_sort_adds_id_tie_breaker() {
        let sort = MongoEventRepository::build_sort(&EventQuery::default());
        assert_eq!(sort, doc! { "dateTime": 1, "_id": 1 });

        let sort = MongoEventRepository::build_sort(&EventQuery {
            sort_by: SortField::PrizeThird,
            order: SortOrder::Desc,
            ..Default::default()
        });
        assert_eq!(sort, doc! { "prizeMoney.third": -1, "_id": -1 });

        let sort = MongoEventRepository::build_sort(&EventQuery {
            sort_by: SortField::Id,
            ..Default::default()
        });
        assert_eq!(sort, doc! { "_id": 1 });
    }

    #[test]
    fn test_document_round_trip_keeps_fields() {
        let oid = ObjectId::new();
        let event = sample_event(&oid.to_hex());

        let document = EventDocument::from_event(&event).unwrap();
        assert_eq!(document.id, Some(oid));

        let stored = bson::to_document(&document).unwrap();
        assert!(stored.contains_key("_id"));
        assert!(stored.contains_key("prizeMoney"));
        assert!(stored.contains_key("maxTeamSize"));
        assert_eq!(stored.get_str("eventType").unwrap(), "Technical");
        assert!(matches!(stored.get("dateTime"), Some(Bson::DateTime(_))));

        assert_eq!(Event::from(document), event);
    }

    #[test]
    fn test_malformed_object_id() {
        assert!(matches!(
            parse_object_id("abc"),
            Err(EventError::InvalidId(id)) if id == "abc"
        ));
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_ok());
    }

    #[test]
    fn test_bson_number() {
        assert_eq!(bson_number(Some(&Bson::Int32(3))), 3.0);
        assert_eq!(bson_number(Some(&Bson::Int64(4))), 4.0);
        assert_eq!(bson_number(Some(&Bson::Double(2.5))), 2.5);
        assert_eq!(bson_number(None), 0.0);
    }
}
