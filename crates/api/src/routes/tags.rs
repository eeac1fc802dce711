//! Tag listing route.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::{EventWithGroup, FilterSelection, Group, ListTagsResponse};
use domain::services::{aggregate_tags, select_events, RetentionWindow};
use persistence::repositories::{EventRepository, GroupRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Every tag a visitor can filter by: approved groups plus visible
/// upcoming events.
///
/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<ListTagsResponse>, ApiError> {
    let today = state.config.feeds.today(Utc::now());
    let window = RetentionWindow::UPCOMING;

    let groups: Vec<Group> = GroupRepository::new(state.pool.clone())
        .list_approved()
        .await?
        .into_iter()
        .map(Group::from)
        .collect();
    let events: Vec<EventWithGroup> = EventRepository::new(state.pool.clone())
        .list_approved_since(window.earliest(today))
        .await?
        .into_iter()
        .map(EventWithGroup::from)
        .collect();
    let visible = select_events(events, &FilterSelection::default(), window, today);

    let tags = aggregate_tags(&groups, &visible, std::iter::empty());
    Ok(Json(ListTagsResponse { tags }))
}
