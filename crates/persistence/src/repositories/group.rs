//! Group repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GroupEntity;
use crate::metrics::QueryTimer;

/// Fields of a user-submitted group.
#[derive(Debug, Clone, Default)]
pub struct NewGroup<'a> {
    pub name: &'a str,
    pub meetup_link: Option<&'a str>,
    pub luma_link: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub tags: &'a [String],
    pub external_id: Option<&'a str>,
}

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All approved groups, ordered by name.
    pub async fn list_approved(&self) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_approved_groups");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, meetup_link, luma_link, contact_email, tags, status, external_id, created_at, updated_at
            FROM groups
            WHERE status = 'approved'
            ORDER BY LOWER(name) ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a group by name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_name");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, meetup_link, luma_link, contact_email, tags, status, external_id, created_at, updated_at
            FROM groups
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Store a submitted group awaiting moderation.
    pub async fn create_pending(&self, new: &NewGroup<'_>) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pending_group");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, meetup_link, luma_link, contact_email, tags, external_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING id, name, meetup_link, luma_link, contact_email, tags, status, external_id, created_at, updated_at
            "#,
        )
        .bind(new.name.trim())
        .bind(new.meetup_link)
        .bind(new.luma_link)
        .bind(new.contact_email)
        .bind(new.tags)
        .bind(new.external_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Approved groups that have a Meetup page to scrape.
    pub async fn list_scrape_sources(&self) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_scrape_sources");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, meetup_link, luma_link, contact_email, tags, status, external_id, created_at, updated_at
            FROM groups
            WHERE status = 'approved' AND meetup_link IS NOT NULL AND meetup_link <> ''
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Replace a group's tags. Returns true when the stored tags changed.
    pub async fn update_tags(&self, id: Uuid, tags: &[String]) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_group_tags");
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET tags = $2, updated_at = NOW()
            WHERE id = $1 AND tags IS DISTINCT FROM $2
            "#,
        )
        .bind(id)
        .bind(tags)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        result.map(|r| r.rows_affected() > 0)
    }
}
