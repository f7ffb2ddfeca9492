//! Request DTOs, their field rules, and normalization into domain inputs.

use crate::error::{EventError, EventResult};
use crate::models::{
    DEFAULT_LIMIT, DEFAULT_PAGE, EventPatch, EventQuery, EventType, ListQuery, MAX_LIMIT,
    MAX_PAGE, NewEvent, PrizeMoney, PrizeMoneyPatch, SortField, SortOrder,
};
use axum_helpers::FieldError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 1000;
pub const VENUE_MAX: usize = 200;
pub const TEAM_SIZE_MIN: u32 = 1;
pub const TEAM_SIZE_MAX: u32 = 50;
/// Upper bound for a single prize; keeps stored sums and stats finite.
pub const PRIZE_MAX: f64 = 1e12;

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(n) => *n,
            NumberInput::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn bounded_text(value: &str, label: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(rule("empty", format!("{label} cannot be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(rule(
            "length",
            format!("{label} cannot exceed {max} characters"),
        ));
    }
    Ok(())
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    bounded_text(value, "Title", TITLE_MAX)?;
    // Case mapping can lengthen a title (`ß` -> `SS`); bound the stored form.
    if title_case(value).chars().count() > TITLE_MAX {
        return Err(rule(
            "length",
            format!("Title cannot exceed {TITLE_MAX} characters"),
        ));
    }
    Ok(())
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    bounded_text(value, "Description", DESCRIPTION_MAX)
}

fn validate_venue(value: &str) -> Result<(), ValidationError> {
    bounded_text(value, "Venue", VENUE_MAX)
}

fn prize_amount(value: &NumberInput, place: &str) -> Result<(), ValidationError> {
    match value.as_f64() {
        None => Err(rule("number", format!("{place} prize must be a number"))),
        Some(amount) if amount < 0.0 => {
            Err(rule("range", format!("{place} prize cannot be negative")))
        }
        Some(amount) if amount > PRIZE_MAX => Err(rule(
            "range",
            format!("{place} prize cannot exceed {PRIZE_MAX}"),
        )),
        Some(_) => Ok(()),
    }
}

fn validate_first_prize(value: &NumberInput) -> Result<(), ValidationError> {
    prize_amount(value, "First")
}

fn validate_second_prize(value: &NumberInput) -> Result<(), ValidationError> {
    prize_amount(value, "Second")
}

fn validate_third_prize(value: &NumberInput) -> Result<(), ValidationError> {
    prize_amount(value, "Third")
}

/// RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` as UTC, or `YYYY-MM-DD` as midnight UTC.
pub fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_date_time(value: &str) -> Result<(), ValidationError> {
    match parse_date_time(value) {
        None => Err(rule(
            "date",
            "Date and time must be a valid ISO 8601 date",
        )),
        Some(dt) if dt <= Utc::now() => Err(rule("future", "Event date must be in the future")),
        Some(_) => Ok(()),
    }
}

fn validate_event_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<EventType>().map(|_| ()).map_err(|_| {
        rule(
            "event_type",
            format!("Event type must be one of: {}", EventType::allowed_values()),
        )
    })
}

fn team_size(value: &NumberInput) -> Result<u32, ValidationError> {
    let size = value
        .as_f64()
        .filter(|n| n.fract() == 0.0)
        .ok_or_else(|| rule("integer", "Max team size must be an integer"))?;
    if size < TEAM_SIZE_MIN as f64 || size > TEAM_SIZE_MAX as f64 {
        return Err(rule(
            "range",
            format!("Max team size must be between {TEAM_SIZE_MIN} and {TEAM_SIZE_MAX}"),
        ));
    }
    Ok(size as u32)
}

fn validate_team_size(value: &NumberInput) -> Result<(), ValidationError> {
    team_size(value).map(|_| ())
}

/// Capitalize the first letter of every whitespace-separated word and
/// lower-case the rest. Inner whitespace is kept as-is.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.trim().chars() {
        if c.is_whitespace() {
            out.push(c);
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PrizeMoneyInput {
    #[validate(
        required(message = "First prize is required"),
        custom(function = "validate_first_prize")
    )]
    pub first: Option<NumberInput>,
    #[validate(
        required(message = "Second prize is required"),
        custom(function = "validate_second_prize")
    )]
    pub second: Option<NumberInput>,
    #[validate(
        required(message = "Third prize is required"),
        custom(function = "validate_third_prize")
    )]
    pub third: Option<NumberInput>,
}

/// Body of `POST /events` and `PUT /events/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(
        required(message = "Title is required"),
        custom(function = "validate_title")
    )]
    #[schema(example = "robotics war")]
    pub title: Option<String>,

    #[validate(
        required(message = "Description is required"),
        custom(function = "validate_description")
    )]
    pub description: Option<String>,

    #[validate(required(message = "Prize money is required"), nested)]
    pub prize_money: Option<PrizeMoneyInput>,

    #[validate(
        required(message = "Date and time is required"),
        custom(function = "validate_date_time")
    )]
    #[schema(example = "2030-03-15T10:00:00Z")]
    pub date_time: Option<String>,

    #[validate(
        required(message = "Venue is required"),
        custom(function = "validate_venue")
    )]
    pub venue: Option<String>,

    #[validate(
        required(message = "Event type is required"),
        custom(function = "validate_event_type")
    )]
    #[schema(example = "Technical")]
    pub event_type: Option<String>,

    #[validate(
        required(message = "Max team size is required"),
        custom(function = "validate_team_size")
    )]
    pub max_team_size: Option<NumberInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PrizeMoneyPatchInput {
    #[validate(custom(function = "validate_first_prize"))]
    pub first: Option<NumberInput>,
    #[validate(custom(function = "validate_second_prize"))]
    pub second: Option<NumberInput>,
    #[validate(custom(function = "validate_third_prize"))]
    pub third: Option<NumberInput>,
}

/// Body of `PATCH /events/{id}`. Rules apply only to fields that are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub prize_money: Option<PrizeMoneyPatchInput>,
    #[validate(custom(function = "validate_date_time"))]
    pub date_time: Option<String>,
    #[validate(custom(function = "validate_venue"))]
    pub venue: Option<String>,
    #[validate(custom(function = "validate_event_type"))]
    pub event_type: Option<String>,
    #[validate(custom(function = "validate_team_size"))]
    pub max_team_size: Option<NumberInput>,
}

fn present<T>(value: Option<T>, field: &str, message: &str) -> EventResult<T> {
    value.ok_or_else(|| EventError::Validation(vec![FieldError::new(field, message)]))
}

fn invalid(field: &str, error: ValidationError) -> EventError {
    let message = error
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{field} is invalid"));
    EventError::Validation(vec![FieldError::new(field, message)])
}

fn amount(value: &NumberInput, field: &str, place: &str) -> EventResult<f64> {
    prize_amount(value, place).map_err(|e| invalid(field, e))?;
    value
        .as_f64()
        .ok_or_else(|| EventError::Validation(vec![FieldError::new(field, format!("{place} prize must be a number"))]))
}

fn date_time(raw: &str) -> EventResult<DateTime<Utc>> {
    validate_date_time(raw).map_err(|e| invalid("dateTime", e))?;
    parse_date_time(raw).ok_or_else(|| {
        EventError::Validation(vec![FieldError::new(
            "dateTime",
            "Date and time must be a valid ISO 8601 date",
        )])
    })
}

fn event_type(raw: &str) -> EventResult<EventType> {
    validate_event_type(raw).map_err(|e| invalid("eventType", e))?;
    raw.parse::<EventType>()
        .map_err(|e| EventError::Internal(e.to_string()))
}

impl TryFrom<CreateEvent> for NewEvent {
    type Error = EventError;

    /// Validate every rule, then trim, title-case and coerce.
    fn try_from(input: CreateEvent) -> EventResult<Self> {
        input.validate()?;

        let prize = present(input.prize_money, "prizeMoney", "Prize money is required")?;
        let first = present(prize.first, "prizeMoney.first", "First prize is required")?;
        let second = present(prize.second, "prizeMoney.second", "Second prize is required")?;
        let third = present(prize.third, "prizeMoney.third", "Third prize is required")?;
        let max_team_size = present(input.max_team_size, "maxTeamSize", "Max team size is required")?;

        Ok(NewEvent {
            title: title_case(&present(input.title, "title", "Title is required")?),
            description: present(input.description, "description", "Description is required")?
                .trim()
                .to_string(),
            prize_money: PrizeMoney {
                first: amount(&first, "prizeMoney.first", "First")?,
                second: amount(&second, "prizeMoney.second", "Second")?,
                third: amount(&third, "prizeMoney.third", "Third")?,
            },
            date_time: date_time(&present(input.date_time, "dateTime", "Date and time is required")?)?,
            venue: present(input.venue, "venue", "Venue is required")?
                .trim()
                .to_string(),
            event_type: event_type(&present(input.event_type, "eventType", "Event type is required")?)?,
            max_team_size: team_size(&max_team_size).map_err(|e| invalid("maxTeamSize", e))?,
        })
    }
}

impl TryFrom<UpdateEvent> for EventPatch {
    type Error = EventError;

    fn try_from(input: UpdateEvent) -> EventResult<Self> {
        input.validate()?;

        let prize_money = match input.prize_money {
            None => None,
            Some(prize) => Some(PrizeMoneyPatch {
                first: prize
                    .first
                    .map(|v| amount(&v, "prizeMoney.first", "First"))
                    .transpose()?,
                second: prize
                    .second
                    .map(|v| amount(&v, "prizeMoney.second", "Second"))
                    .transpose()?,
                third: prize
                    .third
                    .map(|v| amount(&v, "prizeMoney.third", "Third"))
                    .transpose()?,
            }),
        };

        Ok(EventPatch {
            title: input.title.map(|t| title_case(&t)),
            description: input.description.map(|d| d.trim().to_string()),
            prize_money,
            date_time: input.date_time.as_deref().map(date_time).transpose()?,
            venue: input.venue.map(|v| v.trim().to_string()),
            event_type: input.event_type.as_deref().map(event_type).transpose()?,
            max_team_size: input
                .max_team_size
                .map(|v| team_size(&v).map_err(|e| invalid("maxTeamSize", e)))
                .transpose()?,
        })
    }
}

fn lenient_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

impl TryFrom<ListQuery> for EventQuery {
    type Error = EventError;

    /// Pagination falls back to defaults; unknown filters and sort keys are rejected.
    fn try_from(raw: ListQuery) -> EventResult<Self> {
        let mut errors = Vec::new();

        let event_type = match raw.event_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => match value.parse::<EventType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push(FieldError::new(
                        "eventType",
                        format!("Event type must be one of: {}", EventType::allowed_values()),
                    ));
                    None
                }
            },
        };

        let sort_by = match raw.sort_by.as_deref().map(str::trim) {
            None | Some("") => SortField::default(),
            Some(value) => SortField::parse(value).unwrap_or_else(|| {
                let allowed: Vec<_> = SortField::ALL.iter().map(|f| f.as_str()).collect();
                errors.push(FieldError::new(
                    "sortBy",
                    format!("Sort field must be one of: {}", allowed.join(", ")),
                ));
                SortField::default()
            }),
        };

        let order = match raw.order.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(value) => SortOrder::parse(value).unwrap_or_else(|| {
                errors.push(FieldError::new(
                    "order",
                    "Sort order must be one of: asc, desc",
                ));
                SortOrder::default()
            }),
        };

        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(EventError::Validation(errors));
        }

        let page = lenient_u64(raw.page.as_deref(), DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let limit = lenient_u64(raw.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Ok(EventQuery {
            event_type,
            page,
            limit,
            sort_by,
            order,
        })
    }
}
