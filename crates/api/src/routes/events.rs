//! Public event routes: upcoming listing, detail and submission.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{
    CreateEventRequest, EventResponse, EventWithGroup, FilterSelection, ListEventsQuery,
    ListEventsResponse, ModerationStatus, SubmissionResponse,
};
use domain::services::{is_publicly_visible, select_events, RetentionWindow};
use persistence::repositories::{EventRepository, GroupRepository, NewEvent, NewGroup};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_submission;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 500;

fn effective_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// List visible upcoming events matching the selection.
///
/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let selection = FilterSelection::from_params(query.groups.as_deref(), query.tags.as_deref(), query.date)?;
    let today = state.config.feeds.today(Utc::now());
    let window = RetentionWindow::UPCOMING;

    let rows = EventRepository::new(state.pool.clone())
        .list_approved_since(window.earliest(today))
        .await?;
    let events: Vec<EventWithGroup> = rows.into_iter().map(Into::into).collect();
    let selected = select_events(events, &selection, window, today);

    let total = selected.len();
    let events = selected
        .into_iter()
        .take(effective_limit(query.limit))
        .map(EventResponse::from)
        .collect();

    Ok(Json(ListEventsResponse { events, total }))
}

/// Get one publicly visible event.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let item = EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .map(EventWithGroup::from)
        .filter(is_publicly_visible)
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    Ok(Json(item.into()))
}

/// Resolve a submitted group name to an existing group, or register it as
/// a pending one.
async fn resolve_group(state: &AppState, name: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    let repo = GroupRepository::new(state.pool.clone());
    if let Some(existing) = repo.find_by_name(name).await? {
        return Ok(Some(existing.id));
    }

    let created = repo
        .create_pending(&NewGroup {
            name,
            ..NewGroup::default()
        })
        .await?;
    info!(group_id = %created.id, group_name = %created.name, "Pending group created from event submission");
    Ok(Some(created.id))
}

/// Submit an event for moderation.
///
/// POST /api/v1/events
pub async fn submit_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    request.validate()?;

    let group_id = resolve_group(&state, request.group.as_deref()).await?;
    let event = EventRepository::new(state.pool.clone())
        .create_pending(&NewEvent {
            title: request.title.trim(),
            event_date: request.event_date,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location.as_deref(),
            venue: &request.venue,
            description: request.description.as_deref(),
            link: request.link.as_deref(),
            tags: &request.tags,
            group_id,
        })
        .await?;

    record_submission("event");
    info!(event_id = %event.id, group_id = ?group_id, "Event submitted for moderation");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            id: event.id,
            status: ModerationStatus::Pending,
        }),
    ))
}
