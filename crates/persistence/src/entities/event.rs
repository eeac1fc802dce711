//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::{Event, EventWithGroup, GroupRef, Venue};
use sqlx::FromRow;
use uuid::Uuid;

use super::ModerationStatusDb;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub group_id: Option<Uuid>,
    pub external_id: Option<String>,
    pub status: ModerationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            event_date: entity.event_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            location: entity.location,
            venue: Venue {
                name: entity.venue_name,
                address_line_1: entity.address_line_1,
                address_line_2: entity.address_line_2,
                city: entity.city,
                state: entity.state,
                postal_code: entity.postal_code,
                country: entity.country,
            },
            description: entity.description,
            link: entity.link,
            image_url: entity.image_url,
            tags: entity.tags,
            group_id: entity.group_id,
            external_id: entity.external_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// An event row left-joined with its group.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithGroupEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub group_name: Option<String>,
    pub group_status: Option<ModerationStatusDb>,
    pub group_tags: Option<Vec<String>>,
}

impl From<EventWithGroupEntity> for EventWithGroup {
    fn from(entity: EventWithGroupEntity) -> Self {
        let group = match (entity.event.group_id, entity.group_name, entity.group_status) {
            (Some(id), Some(name), Some(status)) => Some(GroupRef {
                id,
                name,
                status: status.into(),
                tags: entity.group_tags.unwrap_or_default(),
            }),
            _ => None,
        };
        Self {
            event: entity.event.into(),
            group,
        }
    }
}

/// Result row of an upsert, flagging whether the row was newly inserted.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedEventEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub inserted: bool,
}
