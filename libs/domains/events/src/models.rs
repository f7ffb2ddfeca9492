//! Event domain models

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString, VariantNames};
use utoipa::{IntoParams, ToSchema};

/// Competition category. Matching is case-sensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    ToSchema,
)]
pub enum EventType {
    Technical,
    Cultural,
    Sports,
    Academic,
    Literary,
    Art,
    Music,
    Dance,
}

impl EventType {
    /// `Technical, Cultural, ...` in declaration order.
    pub fn allowed_values() -> String {
        Self::VARIANTS.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct PrizeMoney {
    #[schema(example = 5000.0)]
    pub first: f64,
    #[schema(example = 3000.0)]
    pub second: f64,
    #[schema(example = 1000.0)]
    pub third: f64,
}

impl PrizeMoney {
    pub fn total(&self) -> f64 {
        self.first + self.second + self.third
    }
}

/// A stored competition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// `"1"`, `"2"`, ... in memory; a 24-hex ObjectId in MongoDB
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "Robotics War")]
    pub title: String,
    pub description: String,
    pub prize_money: PrizeMoney,
    pub date_time: DateTime<Utc>,
    pub venue: String,
    pub event_type: EventType,
    #[schema(example = 4)]
    pub max_team_size: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully validated and normalized payload for create and replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub prize_money: PrizeMoney,
    pub date_time: DateTime<Utc>,
    pub venue: String,
    pub event_type: EventType,
    pub max_team_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrizeMoneyPatch {
    pub first: Option<f64>,
    pub second: Option<f64>,
    pub third: Option<f64>,
}

/// Normalized partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prize_money: Option<PrizeMoneyPatch>,
    pub date_time: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub event_type: Option<EventType>,
    pub max_team_size: Option<u32>,
}

/// Drop sub-millisecond precision so both backends store identical instants.
pub fn truncate_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

impl Event {
    pub fn new(id: impl Into<String>, input: NewEvent, now: DateTime<Utc>) -> Self {
        let now = truncate_millis(now);
        Self {
            id: id.into(),
            title: input.title,
            description: input.description,
            prize_money: input.prize_money,
            date_time: truncate_millis(input.date_time),
            venue: input.venue,
            event_type: input.event_type,
            max_team_size: input.max_team_size,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite everything except `id` and `created_at`.
    pub fn replace_with(&mut self, input: NewEvent, now: DateTime<Utc>) {
        self.title = input.title;
        self.description = input.description;
        self.prize_money = input.prize_money;
        self.date_time = truncate_millis(input.date_time);
        self.venue = input.venue;
        self.event_type = input.event_type;
        self.max_team_size = input.max_team_size;
        self.touch(now);
    }

    /// Merge present fields; prize money merges per place.
    pub fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(prize) = patch.prize_money {
            if let Some(first) = prize.first {
                self.prize_money.first = first;
            }
            if let Some(second) = prize.second {
                self.prize_money.second = second;
            }
            if let Some(third) = prize.third {
                self.prize_money.third = third;
            }
        }
        if let Some(date_time) = patch.date_time {
            self.date_time = truncate_millis(date_time);
        }
        if let Some(venue) = patch.venue {
            self.venue = venue;
        }
        if let Some(event_type) = patch.event_type {
            self.event_type = event_type;
        }
        if let Some(max_team_size) = patch.max_team_size {
            self.max_team_size = max_team_size;
        }
        self.touch(now);
    }

    /// Advance `updated_at`, by at least one millisecond.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let now = truncate_millis(now);
        let floor = self.updated_at + TimeDelta::milliseconds(1);
        self.updated_at = if now >= floor { now } else { floor };
    }
}

/// Sortable attributes, addressed by their JSON path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Title,
    Description,
    PrizeFirst,
    PrizeSecond,
    PrizeThird,
    #[default]
    DateTime,
    Venue,
    EventType,
    MaxTeamSize,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 12] = [
        SortField::Id,
        SortField::Title,
        SortField::Description,
        SortField::PrizeFirst,
        SortField::PrizeSecond,
        SortField::PrizeThird,
        SortField::DateTime,
        SortField::Venue,
        SortField::EventType,
        SortField::MaxTeamSize,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::PrizeFirst => "prizeMoney.first",
            SortField::PrizeSecond => "prizeMoney.second",
            SortField::PrizeThird => "prizeMoney.third",
            SortField::DateTime => "dateTime",
            SortField::Venue => "venue",
            SortField::EventType => "eventType",
            SortField::MaxTeamSize => "maxTeamSize",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `asc`/`ascending`/`1` or `desc`/`descending`/`-1`, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(SortOrder::Asc),
            "desc" | "descending" | "-1" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;
/// Highest page whose offset still fits the signed 64-bit skip MongoDB takes.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Raw list query string. Everything is optional; conversion into
/// [`EventQuery`] validates it.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Exact event type
    pub event_type: Option<String>,
    /// 1-based page, defaults to 1
    pub page: Option<String>,
    /// Page size, defaults to 50, capped at 100
    pub limit: Option<String>,
    /// JSON path of the sort field, defaults to `dateTime`
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`
    pub order: Option<String>,
}

/// Validated list query handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub page: u64,
    pub limit: u64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            event_type: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl EventQuery {
    /// Offset of the first record on `page`, never above `i64::MAX`.
    pub fn skip(&self) -> u64 {
        (self.page.max(1) - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_events: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            current_page: page,
            total_pages,
            total_events: total,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeStats {
    pub event_type: EventType,
    pub count: u64,
    pub total_prize_money: f64,
}

/// Aggregates over every stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: u64,
    pub total_prize_money: f64,
    pub average_prize_money: f64,
    /// Distinct types present, sorted by name
    pub event_types: Vec<EventType>,
    /// Sorted by count descending, then by name
    pub by_type: Vec<EventTypeStats>,
}

impl EventStats {
    /// Build from per-type buckets in any order.
    pub fn from_buckets(buckets: impl IntoIterator<Item = EventTypeStats>) -> Self {
        let mut by_type: Vec<EventTypeStats> = buckets.into_iter().filter(|b| b.count > 0).collect();
        by_type.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.event_type.to_string().cmp(&b.event_type.to_string()))
        });

        let total_events: u64 = by_type.iter().map(|b| b.count).sum();
        let total_prize_money: f64 = by_type.iter().map(|b| b.total_prize_money).sum();
        let average_prize_money = if total_events == 0 {
            0.0
        } else {
            total_prize_money / total_events as f64
        };

        let mut event_types: Vec<EventType> = by_type.iter().map(|b| b.event_type).collect();
        event_types.sort_by_key(|t| t.to_string());

        Self {
            total_events,
            total_prize_money,
            average_prize_money,
            event_types,
            by_type,
        }
    }

    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut buckets: BTreeMap<String, EventTypeStats> = BTreeMap::new();
        for event in events {
            let bucket = buckets
                .entry(event.event_type.to_string())
                .or_insert(EventTypeStats {
                    event_type: event.event_type,
                    count: 0,
                    total_prize_money: 0.0,
                });
            bucket.count += 1;
            bucket.total_prize_money += event.prize_money.total();
        }
        Self::from_buckets(buckets.into_values())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResult {
    pub deleted_count: u64,
}

/// Storage section of the API health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    #[schema(example = "memory")]
    pub backend: String,
    pub connected: bool,
    #[schema(example = "connected")]
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_count: Option<u64>,
}
