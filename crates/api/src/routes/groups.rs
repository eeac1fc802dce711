//! Group routes: approved listing and submission.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{
    CreateGroupRequest, Group, GroupResponse, ListGroupsResponse, ModerationStatus, SubmissionResponse,
};
use domain::services::ingestion::group_external_id;
use persistence::repositories::{GroupRepository, NewGroup};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_submission;

/// List approved groups by name.
///
/// GET /api/v1/groups
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<ListGroupsResponse>, ApiError> {
    let groups: Vec<GroupResponse> = GroupRepository::new(state.pool.clone())
        .list_approved()
        .await?
        .into_iter()
        .map(|entity| GroupResponse::from(Group::from(entity)))
        .collect();

    Ok(Json(ListGroupsResponse {
        total: groups.len(),
        groups,
    }))
}

/// Submit a group for moderation.
///
/// POST /api/v1/groups
///
/// A second submission of the same name or source link answers 409.
pub async fn submit_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    request.validate()?;

    let meetup_link = request.meetup_link.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let luma_link = request.luma_link.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let external_id = group_external_id(meetup_link, luma_link);

    let group = GroupRepository::new(state.pool.clone())
        .create_pending(&NewGroup {
            name: &request.name,
            meetup_link,
            luma_link,
            contact_email: request.contact_email.as_deref(),
            tags: &request.tags,
            external_id: external_id.as_deref(),
        })
        .await?;

    record_submission("group");
    info!(group_id = %group.id, group_name = %group.name, "Group submitted for moderation");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            id: group.id,
            status: ModerationStatus::Pending,
        }),
    ))
}
