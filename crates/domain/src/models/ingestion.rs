//! Models for scraped event ingestion.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Venue;

/// A raw candidate event produced by a scraper, already in local time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScrapedEvent {
    pub title: String,
    pub link: Option<String>,
    pub external_id: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Everything a scraper found on one group's source page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedGroupPage {
    pub events: Vec<ScrapedEvent>,
    /// Topic tags listed for the group, empty when none were found.
    pub topics: Vec<String>,
}

/// A validated row ready to be upserted on `(group_id, external_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUpsert {
    pub group_id: Uuid,
    pub external_id: String,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub venue: Venue,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Whether an upsert inserted a new row or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Totals reported after an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestionSummary {
    pub total_groups: usize,
    pub groups_failed: usize,
    pub events_processed: usize,
    pub events_created: usize,
    pub events_updated: usize,
    pub events_skipped: usize,
}

impl IngestionSummary {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.events_created += 1,
            UpsertOutcome::Updated => self.events_updated += 1,
        }
    }
}
