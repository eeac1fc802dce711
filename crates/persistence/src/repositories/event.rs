//! Event repository for database operations.

use chrono::NaiveDate;
use domain::models::{EventUpsert, UpsertOutcome, Venue};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventEntity, EventWithGroupEntity, UpsertedEventEntity};
use crate::metrics::QueryTimer;

/// Fields of a user-submitted event.
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub title: &'a str,
    pub event_date: NaiveDate,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub location: Option<&'a str>,
    pub venue: &'a Venue,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
    pub tags: &'a [String],
    pub group_id: Option<Uuid>,
}

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Approved events on or after `since`, joined with their group.
    ///
    /// The status filter is only a pre-filter; callers still run the
    /// visibility gate on every row.
    pub async fn list_approved_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<EventWithGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_approved_events_since");
        let result = sqlx::query_as::<_, EventWithGroupEntity>(
            r#"
            SELECT
                e.id, e.title, e.event_date, e.start_time, e.end_time, e.location,
                e.venue_name, e.address_line_1, e.address_line_2, e.city, e.state,
                e.postal_code, e.country, e.description, e.link, e.image_url, e.tags,
                e.group_id, e.external_id, e.status, e.created_at, e.updated_at,
                g.name AS group_name, g.status AS group_status, g.tags AS group_tags
            FROM events e
            LEFT JOIN groups g ON g.id = e.group_id
            WHERE e.status = 'approved'
              AND (g.id IS NULL OR g.status = 'approved')
              AND e.event_date >= $1
            ORDER BY e.event_date ASC, e.start_time ASC NULLS FIRST, e.title ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find an event by ID regardless of status, joined with its group.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventWithGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventWithGroupEntity>(
            r#"
            SELECT
                e.id, e.title, e.event_date, e.start_time, e.end_time, e.location,
                e.venue_name, e.address_line_1, e.address_line_2, e.city, e.state,
                e.postal_code, e.country, e.description, e.link, e.image_url, e.tags,
                e.group_id, e.external_id, e.status, e.created_at, e.updated_at,
                g.name AS group_name, g.status AS group_status, g.tags AS group_tags
            FROM events e
            LEFT JOIN groups g ON g.id = e.group_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Store a submitted event awaiting moderation.
    pub async fn create_pending(&self, new: &NewEvent<'_>) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pending_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (
                title, event_date, start_time, end_time, location,
                venue_name, address_line_1, address_line_2, city, state, postal_code, country,
                description, link, tags, group_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, 'pending')
            RETURNING id, title, event_date, start_time, end_time, location,
                venue_name, address_line_1, address_line_2, city, state, postal_code, country,
                description, link, image_url, tags, group_id, external_id, status,
                created_at, updated_at
            "#,
        )
        .bind(new.title)
        .bind(new.event_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.location)
        .bind(new.venue.name.as_deref())
        .bind(new.venue.address_line_1.as_deref())
        .bind(new.venue.address_line_2.as_deref())
        .bind(new.venue.city.as_deref())
        .bind(new.venue.state.as_deref())
        .bind(new.venue.postal_code.as_deref())
        .bind(new.venue.country.as_deref())
        .bind(new.description)
        .bind(new.link)
        .bind(new.tags)
        .bind(new.group_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Insert or refresh a scraped event keyed on `(group_id, external_id)`.
    ///
    /// New rows are approved. Existing rows keep their moderation status and
    /// tags, and `updated_at` only moves when a scraped field changed.
    pub async fn upsert_scraped(
        &self,
        upsert: &EventUpsert,
    ) -> Result<(EventEntity, UpsertOutcome), sqlx::Error> {
        let timer = QueryTimer::new("upsert_scraped_event");
        let result = sqlx::query_as::<_, UpsertedEventEntity>(
            r#"
            INSERT INTO events (
                group_id, external_id, title, event_date, start_time, location,
                venue_name, description, link, image_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'approved')
            ON CONFLICT (group_id, external_id) DO UPDATE SET
                title = EXCLUDED.title,
                event_date = EXCLUDED.event_date,
                start_time = EXCLUDED.start_time,
                location = EXCLUDED.location,
                venue_name = EXCLUDED.venue_name,
                description = EXCLUDED.description,
                link = EXCLUDED.link,
                image_url = EXCLUDED.image_url,
                updated_at = CASE
                    WHEN (events.title, events.event_date, events.start_time, events.location,
                          events.venue_name, events.description, events.link, events.image_url)
                         IS DISTINCT FROM
                         (EXCLUDED.title, EXCLUDED.event_date, EXCLUDED.start_time, EXCLUDED.location,
                          EXCLUDED.venue_name, EXCLUDED.description, EXCLUDED.link, EXCLUDED.image_url)
                    THEN NOW()
                    ELSE events.updated_at
                END
            RETURNING id, title, event_date, start_time, end_time, location,
                venue_name, address_line_1, address_line_2, city, state, postal_code, country,
                description, link, image_url, tags, group_id, external_id, status,
                created_at, updated_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(upsert.group_id)
        .bind(&upsert.external_id)
        .bind(&upsert.title)
        .bind(upsert.event_date)
        .bind(upsert.start_time)
        .bind(upsert.location.as_deref())
        .bind(upsert.venue.name.as_deref())
        .bind(upsert.description.as_deref())
        .bind(upsert.link.as_deref())
        .bind(upsert.image_url.as_deref())
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);

        let row = result?;
        let outcome = if row.inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        Ok((row.event, outcome))
    }

    /// Count events for a group, used by ingestion reporting and tests.
    pub async fn count_for_group(&self, group_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_events_for_group");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await;
        timer.finish(&result);
        result
    }
}
