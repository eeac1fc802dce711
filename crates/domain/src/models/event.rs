//! Event domain models for community calendar entries.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::moderation::ModerationStatus;

/// Label used wherever an event has no group.
pub const UNLISTED_GROUP_NAME: &str = "Unlisted Group";

/// Structured venue and postal address of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct Venue {
    #[validate(length(max = 200, message = "Venue name must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "Address line must be at most 200 characters"))]
    pub address_line_1: Option<String>,
    #[validate(length(max = 200, message = "Address line must be at most 200 characters"))]
    pub address_line_2: Option<String>,
    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "State must be at most 100 characters"))]
    pub state: Option<String>,
    #[validate(length(max = 20, message = "Postal code must be at most 20 characters"))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,
}

impl Venue {
    /// Returns true if no venue field carries any text.
    pub fn is_empty(&self) -> bool {
        self.formatted().is_none()
    }

    /// Single-line rendering such as `Church & State, 370 S 300 E, Salt Lake City, UT 84111`.
    pub fn formatted(&self) -> Option<String> {
        fn non_blank(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let region = [non_blank(&self.state), non_blank(&self.postal_code)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let parts: Vec<&str> = [
            non_blank(&self.name),
            non_blank(&self.address_line_1),
            non_blank(&self.address_line_2),
            non_blank(&self.city),
            Some(region.as_str()).filter(|r| !r.is_empty()),
            non_blank(&self.country),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A single calendar occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub venue: Venue,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub group_id: Option<Uuid>,
    pub external_id: Option<String>,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Free-text location if present, else the formatted venue.
    pub fn display_location(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .or_else(|| self.venue.formatted())
    }
}

/// The parts of a group that event consumers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupRef {
    pub id: Uuid,
    pub name: String,
    pub status: ModerationStatus,
    pub tags: Vec<String>,
}

/// An event joined with its resolved group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventWithGroup {
    #[serde(flatten)]
    pub event: Event,
    pub group: Option<GroupRef>,
}

impl EventWithGroup {
    /// Event tags when it has any, otherwise the group's tags.
    ///
    /// This is an either/or fallback, never a union.
    pub fn effective_tags(&self) -> &[String] {
        if !self.event.tags.is_empty() {
            &self.event.tags
        } else {
            self.group.as_ref().map(|g| g.tags.as_slice()).unwrap_or(&[])
        }
    }

    /// Group name, or the unlisted label when the event has no group.
    pub fn group_name(&self) -> &str {
        self.group
            .as_ref()
            .map(|g| g.name.as_str())
            .unwrap_or(UNLISTED_GROUP_NAME)
    }
}

/// Request payload for submitting an event for moderation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    /// Name of an existing group, or of a new one to create as pending.
    #[validate(length(
        min = 1,
        max = 100,
        message = "Group name must be between 1 and 100 characters"
    ))]
    pub group: Option<String>,

    pub event_date: NaiveDate,

    pub start_time: Option<NaiveTime>,

    pub end_time: Option<NaiveTime>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub venue: Venue,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub link: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_tags"))]
    pub tags: Vec<String>,
}

/// Public representation of a visible event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub venue: Option<Venue>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub group_id: Option<Uuid>,
    pub group_name: String,
}

impl From<EventWithGroup> for EventResponse {
    fn from(item: EventWithGroup) -> Self {
        let group_name = item.group_name().to_string();
        let location = item.event.display_location();
        let event = item.event;
        Self {
            id: event.id,
            title: event.title,
            event_date: event.event_date,
            start_time: event.start_time,
            end_time: event.end_time,
            location,
            venue: Some(event.venue).filter(|v| !v.is_empty()),
            description: event.description,
            link: event.link,
            image_url: event.image_url,
            tags: event.tags,
            group_id: event.group_id,
            group_name,
        }
    }
}

/// Query parameters for listing events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Comma-separated group ids.
    pub groups: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Single calendar day, `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// Response for event listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListEventsResponse {
    pub events: Vec<EventResponse>,
    pub total: usize,
}

/// Response for an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub status: ModerationStatus,
}
