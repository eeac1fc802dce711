//! Domain models for the community calendar.

pub mod event;
pub mod group;
pub mod ingestion;
pub mod moderation;
pub mod selection;

pub use event::{
    CreateEventRequest, Event, EventResponse, EventWithGroup, GroupRef, ListEventsQuery,
    ListEventsResponse, SubmissionResponse, Venue, UNLISTED_GROUP_NAME,
};
pub use group::{CreateGroupRequest, Group, GroupResponse, ListGroupsResponse, ListTagsResponse};
pub use ingestion::{EventUpsert, IngestionSummary, ScrapedEvent, ScrapedGroupPage, UpsertOutcome};
pub use moderation::ModerationStatus;
pub use selection::{FilterSelection, SelectionError};
