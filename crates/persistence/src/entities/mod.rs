//! Database entity definitions.

pub mod event;
pub mod group;
pub mod moderation;

pub use event::{EventEntity, EventWithGroupEntity, UpsertedEventEntity};
pub use group::GroupEntity;
pub use moderation::ModerationStatusDb;
