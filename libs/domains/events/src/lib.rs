//! Events Domain
//!
//! Competition events (title, prize money, venue, schedule, team size) behind
//! a JSON API, stored either in MongoDB or in process memory.
//!
//! # Architecture
//!
//! ```text
//! handlers ──► EventService<R> ──► R: EventRepository
//!   │              │                 ├─► MongoEventRepository    (durable)
//!   │              │                 └─► InMemoryEventRepository (ephemeral)
//!   │              └─ CreateEvent / UpdateEvent / ListQuery normalized here
//!   └─ ValidatedJson rejects malformed payloads before the service runs
//! ```
//!
//! Both repositories honor the same contract, so the router is generic over
//! the backend:
//!
//! ```ignore
//! let service = EventService::new(InMemoryEventRepository::new());
//! let routes = events_router().with_state(Arc::new(service));
//! ```

use utoipa::OpenApi;

mod error;
mod handlers;
mod memory;
mod models;
mod mongo;
mod repository;
mod service;
mod validation;

pub use error::{EventError, EventResult};
pub use handlers::{
    DeleteAllEnvelope, EventEnvelope, EventListEnvelope, EventStatsEnvelope, EventsState,
    events_router,
};
pub use memory::InMemoryEventRepository;
pub use models::{
    DEFAULT_LIMIT, DEFAULT_PAGE, DeleteAllResult, Event, EventPatch, EventQuery, EventStats,
    EventType, EventTypeStats, ListQuery, MAX_LIMIT, MAX_PAGE, NewEvent, Pagination, PrizeMoney,
    PrizeMoneyPatch, SortField, SortOrder, StorageHealth,
};
pub use mongo::{EVENTS_COLLECTION, MongoEventRepository};
pub use repository::EventRepository;
pub use service::EventService;
pub use validation::{CreateEvent, NumberInput, PrizeMoneyInput, PrizeMoneyPatchInput, UpdateEvent};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::create_event,
        handlers::get_stats,
        handlers::get_event,
        handlers::replace_event,
        handlers::update_event,
        handlers::delete_event,
        handlers::delete_all_events,
    ),
    components(
        schemas(
            Event,
            EventType,
            PrizeMoney,
            CreateEvent,
            UpdateEvent,
            PrizeMoneyInput,
            PrizeMoneyPatchInput,
            NumberInput,
            Pagination,
            EventStats,
            EventTypeStats,
            DeleteAllResult,
            EventEnvelope,
            EventListEnvelope,
            EventStatsEnvelope,
            DeleteAllEnvelope,
            axum_helpers::FieldError,
            axum_helpers::errors::responses::ErrorEnvelope,
        ),
        responses(
            axum_helpers::errors::responses::BadRequestValidationResponse,
            axum_helpers::errors::responses::BadRequestIdResponse,
            axum_helpers::errors::responses::NotFoundResponse,
            axum_helpers::errors::responses::InternalServerErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Competition event management")
    )
)]
pub struct ApiDoc;
