//! Scheduled Meetup ingestion.

use std::sync::Arc;

use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::services::{IngestionError, IngestionService};

/// Runs an ingestion pass every `interval_minutes`.
pub struct ScrapeEventsJob {
    ingestion: Arc<IngestionService>,
    interval_minutes: u64,
}

impl ScrapeEventsJob {
    pub fn new(ingestion: Arc<IngestionService>, interval_minutes: u64) -> Self {
        Self {
            ingestion,
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for ScrapeEventsJob {
    fn name(&self) -> &'static str {
        "scrape_events"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        match self.ingestion.run().await {
            Ok(summary) => {
                info!(
                    events_created = summary.events_created,
                    events_updated = summary.events_updated,
                    "Scheduled ingestion finished"
                );
                Ok(())
            }
            // A manual run is in progress; this tick has nothing to do.
            Err(IngestionError::AlreadyRunning) => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}
