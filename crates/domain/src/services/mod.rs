//! Domain services for the community calendar.
//!
//! Services are pure functions over domain models; storage and HTTP live in
//! the outer crates.

pub mod feeds;
pub mod ingestion;
pub mod pipeline;
pub mod selection;
pub mod tags;
pub mod visibility;
pub mod window;

pub use feeds::{render_ical, render_rss, EventSpan, FeedMetadata};
pub use ingestion::{prepare_upsert, SkipReason, SourceLinkError};
pub use pipeline::select_events;
pub use selection::matches_selection;
pub use tags::aggregate_tags;
pub use visibility::is_publicly_visible;
pub use window::RetentionWindow;
