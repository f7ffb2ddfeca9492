//! HTTP handlers for events API

use crate::error::EventError;
use crate::models::{DeleteAllResult, Event, EventStats, ListQuery, Pagination};
use crate::repository::EventRepository;
use crate::service::EventService;
use crate::validation::{CreateEvent, UpdateEvent};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum_helpers::errors::handlers::not_found;
use axum_helpers::{ApiResponse, PathParam, QueryParams, ValidatedJson};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Events router state
pub type EventsState<R> = Arc<EventService<R>>;

/// Routes relative to the mount point (`/api/events` in the server).
pub fn events_router<R: EventRepository + 'static>() -> Router<EventsState<R>> {
    Router::new()
        .route(
            "/",
            get(list_events::<R>)
                .post(create_event::<R>)
                .delete(delete_all_events::<R>),
        )
        .route("/stats", get(get_stats::<R>))
        .route(
            "/{id}",
            get(get_event::<R>)
                .put(replace_event::<R>)
                .patch(update_event::<R>)
                .delete(delete_event::<R>),
        )
        .method_not_allowed_fallback(not_found)
}

/// List events with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of events", body = EventListEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<impl IntoResponse, EventError> {
    let (events, pagination) = state.list(query).await?;
    Ok(ApiResponse::ok("Events retrieved successfully", events).with_pagination(pagination))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, input))]
pub async fn create_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.create(input).await?;
    Ok(ApiResponse::ok("Event created successfully", event).with_status(StatusCode::CREATED))
}

/// Aggregate statistics over all events
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Event statistics", body = EventStatsEnvelope),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn get_stats<R: EventRepository>(
    State(state): State<EventsState<R>>,
) -> Result<impl IntoResponse, EventError> {
    let stats = state.stats().await?;
    Ok(ApiResponse::ok(
        "Event statistics retrieved successfully",
        stats,
    ))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestIdResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn get_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    PathParam(id): PathParam<String>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.get(&id).await?;
    Ok(ApiResponse::ok("Event retrieved successfully", event))
}

/// Replace every field of an event
#[utoipa::path(
    put,
    path = "/{id}",
    params(("id" = String, Path, description = "Event ID")),
    request_body = CreateEvent,
    responses(
        (status = 200, description = "Event replaced", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, input))]
pub async fn replace_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    PathParam(id): PathParam<String>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.replace(&id, input).await?;
    Ok(ApiResponse::ok("Event updated successfully", event))
}

/// Update the supplied fields of an event
///
/// `prizeMoney` is merged key by key, so `{"prizeMoney": {"second": 10}}`
/// leaves `first` and `third` untouched.
#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = String, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, input))]
pub async fn update_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    PathParam(id): PathParam<String>,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.update(&id, input).await?;
    Ok(ApiResponse::ok("Event updated successfully", event))
}

/// Delete event by ID
#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Deleted event", body = EventEnvelope),
        (status = 400, response = axum_helpers::errors::responses::BadRequestIdResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    PathParam(id): PathParam<String>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.delete(&id).await?;
    Ok(ApiResponse::ok("Event deleted successfully", event))
}

/// Delete every event
#[utoipa::path(
    delete,
    path = "",
    responses(
        (status = 200, description = "Number of deleted events", body = DeleteAllEnvelope),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_all_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
) -> Result<impl IntoResponse, EventError> {
    let deleted_count = state.delete_all().await?;
    Ok(ApiResponse::ok(
        "All events deleted successfully",
        DeleteAllResult { deleted_count },
    ))
}

// Documentation-only shapes of the success envelopes.

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EventEnvelope {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Event retrieved successfully")]
    message: String,
    data: Event,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EventListEnvelope {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Events retrieved successfully")]
    message: String,
    data: Vec<Event>,
    pagination: Pagination,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EventStatsEnvelope {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Event statistics retrieved successfully")]
    message: String,
    data: EventStats,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DeleteAllEnvelope {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "All events deleted successfully")]
    message: String,
    data: DeleteAllResult,
}
