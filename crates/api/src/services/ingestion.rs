//! Scraped event ingestion.
//!
//! Pulls each approved group's source page through an [`EventSource`] and
//! upserts the results keyed on `(group_id, external_id)`. One bad group or
//! record never aborts the run.

use std::sync::Arc;

use async_trait::async_trait;
use domain::models::{Group, IngestionSummary, ScrapedGroupPage};
use domain::services::{prepare_upsert, SkipReason};
use persistence::repositories::{EventRepository, GroupRepository};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::meetup::ScrapeError;
use crate::middleware::metrics::{record_ingestion_outcome, record_ingestion_skipped};

/// Anything that can produce the scraped events of a group page.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_group(&self, meetup_link: &str) -> Result<ScrapedGroupPage, ScrapeError>;
}

/// Errors that stop a whole ingestion run.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Ingestion is already running")]
    AlreadyRunning,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::MissingTitle => "missing_title",
        SkipReason::MissingDate => "missing_date",
        SkipReason::MissingIdentity => "missing_identity",
    }
}

/// Runs ingestion passes over every scrapeable group.
pub struct IngestionService {
    groups: GroupRepository,
    events: EventRepository,
    source: Arc<dyn EventSource>,
    running: Mutex<()>,
}

impl IngestionService {
    pub fn new(pool: PgPool, source: Arc<dyn EventSource>) -> Self {
        Self {
            groups: GroupRepository::new(pool.clone()),
            events: EventRepository::new(pool),
            source,
            running: Mutex::new(()),
        }
    }

    /// Scrape and upsert events for all approved groups with a Meetup link.
    ///
    /// Only one run proceeds at a time; a concurrent call fails with
    /// [`IngestionError::AlreadyRunning`].
    pub async fn run(&self) -> Result<IngestionSummary, IngestionError> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| IngestionError::AlreadyRunning)?;

        let groups: Vec<Group> = self
            .groups
            .list_scrape_sources()
            .await?
            .into_iter()
            .map(Group::from)
            .collect();

        let mut summary = IngestionSummary {
            total_groups: groups.len(),
            ..IngestionSummary::default()
        };

        for group in &groups {
            if let Err(e) = self.ingest_group(group, &mut summary).await {
                summary.groups_failed += 1;
                warn!(group_id = %group.id, group = %group.name, error = %e, "Group ingestion failed");
            }
        }

        info!(
            total_groups = summary.total_groups,
            groups_failed = summary.groups_failed,
            events_processed = summary.events_processed,
            events_created = summary.events_created,
            events_updated = summary.events_updated,
            events_skipped = summary.events_skipped,
            "Ingestion run completed"
        );
        Ok(summary)
    }

    async fn ingest_group(&self, group: &Group, summary: &mut IngestionSummary) -> Result<(), GroupFailure> {
        let link = group.meetup_link.as_deref().unwrap_or_default();
        let page = self.source.fetch_group(link).await?;

        if !page.topics.is_empty() && page.topics != group.tags {
            if self.groups.update_tags(group.id, &page.topics).await? {
                debug!(group_id = %group.id, tags = ?page.topics, "Refreshed group tags");
            }
        }

        for scraped in &page.events {
            summary.events_processed += 1;

            let upsert = match prepare_upsert(group.id, scraped) {
                Ok(upsert) => upsert,
                Err(reason) => {
                    summary.events_skipped += 1;
                    record_ingestion_skipped(skip_label(reason));
                    debug!(group_id = %group.id, title = %scraped.title, reason = %reason, "Skipped scraped event");
                    continue;
                }
            };

            match self.events.upsert_scraped(&upsert).await {
                Ok((event, outcome)) => {
                    summary.record(outcome);
                    record_ingestion_outcome(outcome);
                    debug!(group_id = %group.id, event_id = %event.id, outcome = ?outcome, "Upserted event");
                }
                Err(e) => {
                    summary.events_skipped += 1;
                    record_ingestion_skipped("store_error");
                    warn!(
                        group_id = %group.id,
                        external_id = %upsert.external_id,
                        error = %e,
                        "Failed to upsert scraped event"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Why a single group was skipped during a run.
#[derive(Debug, Error)]
enum GroupFailure {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
