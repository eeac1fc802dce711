//! Group entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::ModerationStatusDb;

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub meetup_link: Option<String>,
    pub luma_link: Option<String>,
    pub contact_email: Option<String>,
    pub tags: Vec<String>,
    pub status: ModerationStatusDb,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupEntity> for domain::models::Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            meetup_link: entity.meetup_link,
            luma_link: entity.luma_link,
            contact_email: entity.contact_email,
            tags: entity.tags,
            status: entity.status.into(),
            external_id: entity.external_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
