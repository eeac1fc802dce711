//! Group domain models for organizer communities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::event::GroupRef;
use super::moderation::ModerationStatus;

/// An organizer or community that hosts events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub meetup_link: Option<String>,
    pub luma_link: Option<String>,
    pub contact_email: Option<String>,
    pub tags: Vec<String>,
    pub status: ModerationStatus,
    /// Stable identifier derived from the group's source link.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn to_group_ref(&self) -> GroupRef {
        GroupRef {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            tags: self.tags.clone(),
        }
    }
}

/// Request payload for submitting a group for moderation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_meetup_link"))]
    pub meetup_link: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub luma_link: Option<String>,

    #[validate(email(message = "Contact email must be a valid email address"))]
    pub contact_email: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_tags"))]
    pub tags: Vec<String>,
}

/// Public representation of an approved group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub meetup_link: Option<String>,
    pub luma_link: Option<String>,
    pub tags: Vec<String>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            meetup_link: group.meetup_link,
            luma_link: group.luma_link,
            tags: group.tags,
        }
    }
}

/// Response for group listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListGroupsResponse {
    pub groups: Vec<GroupResponse>,
    pub total: usize,
}

/// Response for tag listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListTagsResponse {
    pub tags: Vec<String>,
}
