//! Outbound integrations and long-running workflows.

pub mod ingestion;
pub mod meetup;

pub use ingestion::{EventSource, IngestionError, IngestionService};
pub use meetup::{MeetupScraper, ScrapeError};
